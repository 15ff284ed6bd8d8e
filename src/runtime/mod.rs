//! Runtime evaluation of parsed programs

mod environment;
mod lisp_evaluator;
mod value;

pub use environment::Environment;
pub use lisp_evaluator::LispEvaluator;
pub use value::{Procedure, Value};
