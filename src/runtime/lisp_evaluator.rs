use crate::builtins::BuiltinRegistry;
use crate::config::InterpreterConfig;
use crate::error::{Error, Result};
use crate::parser::{Node, Program};
use crate::runtime::{Environment, Procedure, Value};
use crate::MAX_EVAL_DEPTH;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

/// LISP evaluator that handles special forms and procedure application
///
/// Special forms:
/// - `(quote datum)` - Datum returned unevaluated, as data
/// - `(define name [value])` - Bind in the current scope
/// - `(set! name value)` - Overwrite the nearest existing binding
/// - `(if cond then [else])` - Conditional
/// - `(begin form...)` - Sequence, value of the last form
/// - `(lambda (params...) body...)` - Closure over the current scope
///
/// Any other list is an application. The root scope outlives every call to
/// [`LispEvaluator::execute`], so top-level definitions accumulate.
pub struct LispEvaluator {
    /// Root scope for top-level forms
    env: Environment,
    /// Native procedures reachable by name
    registry: BuiltinRegistry,
    /// Maximum nesting of form evaluations (0 = only the built-in cap)
    execution_limit: usize,
    /// Current nesting of form evaluations
    depth: usize,
}

impl LispEvaluator {
    /// Creates a new LISP evaluator with the standard builtins
    pub fn new() -> Self {
        Self::with_registry(BuiltinRegistry::new())
    }

    /// Creates a new LISP evaluator with a custom builtin registry
    pub fn with_registry(registry: BuiltinRegistry) -> Self {
        LispEvaluator {
            env: Environment::new(),
            registry,
            execution_limit: 0,
            depth: 0,
        }
    }

    /// Creates a new LISP evaluator from configuration
    pub fn with_config(config: &InterpreterConfig) -> Self {
        let mut evaluator = Self::new();
        evaluator.set_execution_limit(config.execution_limit);
        evaluator
    }

    /// The root scope
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Builtins consulted for unbound head symbols
    pub fn registry(&self) -> &BuiltinRegistry {
        &self.registry
    }

    /// Mutable access for registering or replacing builtins
    pub fn registry_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.registry
    }

    /// The configured limit, as last set (0 = only the built-in cap)
    pub fn execution_limit(&self) -> usize {
        self.execution_limit
    }

    /// Sets the recursion guard
    ///
    /// 0 leaves only [`MAX_EVAL_DEPTH`] in force. Larger limits are clamped to
    /// it, see [`LispEvaluator::effective_limit`].
    pub fn set_execution_limit(&mut self, limit: usize) {
        if limit == 0 || limit > MAX_EVAL_DEPTH {
            debug!(
                requested = limit,
                cap = MAX_EVAL_DEPTH,
                "execution limit clamped to evaluation depth cap"
            );
        }
        self.execution_limit = limit;
    }

    /// Depth at which evaluation actually stops
    pub fn effective_limit(&self) -> usize {
        match self.execution_limit {
            0 => MAX_EVAL_DEPTH,
            limit => limit.min(MAX_EVAL_DEPTH),
        }
    }

    /// Execute a program's top-level forms in order within the root scope
    ///
    /// Returns the value of the last form (`nil` for an empty program) or the
    /// first error raised.
    pub fn execute(&mut self, program: &Program) -> Result<Value> {
        self.depth = 0;
        let root = self.env.clone();
        self.eval_sequence(&program.forms, &root)
    }

    /// Evaluate one form in `env`, counting it against the execution limit
    pub fn eval_form(&mut self, node: &Node, env: &Environment) -> Result<Value> {
        let limit = self.effective_limit();
        self.depth += 1;
        let result = if self.depth > limit {
            warn!(limit, "execution limit exceeded, aborting evaluation");
            Err(Error::ExecutionLimitExceeded { limit })
        } else {
            self.eval_node(node, env)
        };
        self.depth -= 1;
        result
    }

    fn eval_node(&mut self, node: &Node, env: &Environment) -> Result<Value> {
        match node {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Boolean(b) => Ok(Value::Boolean(*b)),
            Node::Symbol(name) => env.get(name),
            Node::List(items) => self.eval_list(node, items, env),
        }
    }

    fn eval_list(&mut self, form: &Node, items: &[Node], env: &Environment) -> Result<Value> {
        let Some((head, operands)) = items.split_first() else {
            return Ok(Value::Nil);
        };

        match head.as_symbol() {
            Some("quote") => self.eval_quote(form, operands),
            Some("define") => self.eval_define(form, operands, env),
            Some("set!") => self.eval_set(form, operands, env),
            Some("if") => self.eval_if(form, operands, env),
            Some("begin") => self.eval_sequence(operands, env),
            Some("lambda") => self.eval_lambda(form, operands, env),
            _ => self.eval_application(head, operands, env),
        }
    }

    // LISP Special Forms Implementation

    /// (quote datum) - Datum as data, unevaluated
    fn eval_quote(&mut self, form: &Node, operands: &[Node]) -> Result<Value> {
        match operands {
            [datum] => Ok(Value::from_syntax(datum)),
            _ => Err(ill_formed(form)),
        }
    }

    /// (define name [value]) - Bind in the current scope, returns the name
    fn eval_define(&mut self, form: &Node, operands: &[Node], env: &Environment) -> Result<Value> {
        let (name, init) = match operands {
            [target] => (target.as_symbol(), None),
            [target, init] => (target.as_symbol(), Some(init)),
            _ => return Err(ill_formed(form)),
        };
        let name = name.ok_or_else(|| ill_formed(form))?;

        let value = match init {
            Some(init) => self.eval_form(init, env)?,
            None => Value::Nil,
        };

        debug!(name, kind = value.type_name(), "define");
        env.define(name, value);
        Ok(Value::Symbol(name.to_string()))
    }

    /// (set! name value) - Overwrite the nearest existing binding
    fn eval_set(&mut self, form: &Node, operands: &[Node], env: &Environment) -> Result<Value> {
        let [target, expr] = operands else {
            return Err(ill_formed(form));
        };
        let name = target.as_symbol().ok_or_else(|| ill_formed(form))?;

        // Target is checked before the value is computed
        if !env.exists(name) {
            return Err(Error::UnboundVariable {
                name: name.to_string(),
            });
        }

        let value = self.eval_form(expr, env)?;
        debug!(name, kind = value.type_name(), "set!");
        env.set(name, value.clone())?;
        Ok(value)
    }

    /// (if cond then [else]) - Only `false` and `nil` are false
    fn eval_if(&mut self, form: &Node, operands: &[Node], env: &Environment) -> Result<Value> {
        let (cond, then_branch, else_branch) = match operands {
            [cond, then_branch] => (cond, then_branch, None),
            [cond, then_branch, else_branch] => (cond, then_branch, Some(else_branch)),
            _ => return Err(ill_formed(form)),
        };

        if self.eval_form(cond, env)?.is_truthy() {
            self.eval_form(then_branch, env)
        } else if let Some(else_branch) = else_branch {
            self.eval_form(else_branch, env)
        } else {
            Ok(Value::Nil)
        }
    }

    /// Evaluates forms in order and returns the last value (`nil` when empty)
    fn eval_sequence(&mut self, forms: &[Node], env: &Environment) -> Result<Value> {
        let mut last_val = Value::Nil;
        for form in forms {
            last_val = self.eval_form(form, env)?;
        }
        Ok(last_val)
    }

    /// (lambda (params...) body...) - Closure over `env`
    fn eval_lambda(&mut self, form: &Node, operands: &[Node], env: &Environment) -> Result<Value> {
        let Some((Node::List(param_nodes), body)) = operands.split_first() else {
            return Err(ill_formed(form));
        };
        if body.is_empty() {
            return Err(ill_formed(form));
        }

        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(param_nodes.len());
        for param in param_nodes {
            match param.as_symbol() {
                Some(name) if seen.insert(name) => params.push(name.to_string()),
                _ => return Err(ill_formed(form)),
            }
        }

        debug!(params = params.len(), body = body.len(), "lambda");
        Ok(Value::Procedure(Rc::new(Procedure {
            params,
            body: body.to_vec(),
            env: env.clone(),
        })))
    }

    // Application

    /// Applies the head to the evaluated operands
    fn eval_application(&mut self, head: &Node, operands: &[Node], env: &Environment) -> Result<Value> {
        // Bindings shadow builtins; builtins are only reachable by unbound names
        if let Some(name) = head.as_symbol() {
            if env.lookup(name).is_none() {
                if let Some(builtin) = self.registry.get(name) {
                    let args = self.eval_args(operands, env)?;
                    debug!(builtin = name, args = args.len(), "builtin call");
                    return builtin.execute(&args);
                }
            }
        }

        let callee = self.eval_form(head, env)?;
        match &callee {
            Value::Procedure(proc) => {
                let args = self.eval_args(operands, env)?;
                self.apply_procedure(proc, args)
            }
            other => Err(Error::NotApplicable {
                value: other.to_string(),
            }),
        }
    }

    fn eval_args(&mut self, operands: &[Node], env: &Environment) -> Result<Vec<Value>> {
        let mut args = Vec::with_capacity(operands.len());
        for operand in operands {
            args.push(self.eval_form(operand, env)?);
        }
        Ok(args)
    }

    /// Binds arguments in a fresh child of the captured scope and runs the body
    pub fn apply_procedure(&mut self, proc: &Procedure, args: Vec<Value>) -> Result<Value> {
        if proc.params.len() != args.len() {
            return Err(Error::ArityMismatch {
                expected: proc.params.len(),
                got: args.len(),
            });
        }

        let call_env = proc.env.child();
        for (param, arg) in proc.params.iter().zip(args) {
            call_env.define(param.as_str(), arg);
        }
        self.eval_sequence(&proc.body, &call_env)
    }
}

impl Default for LispEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn ill_formed(form: &Node) -> Error {
    Error::IllFormedSpecialForm {
        form: form.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Expander, SExprScanner};
    use crate::parser::SExprParser;

    fn parse(source: &str) -> Program {
        let tokens = SExprScanner::new(source).scan_tokens().unwrap();
        let tokens = Expander::new(tokens).expand().unwrap();
        SExprParser::new(tokens).parse().unwrap()
    }

    fn eval_str(evaluator: &mut LispEvaluator, source: &str) -> Result<Value> {
        evaluator.execute(&parse(source))
    }

    fn eval(source: &str) -> Result<Value> {
        eval_str(&mut LispEvaluator::new(), source)
    }

    #[test]
    fn test_self_evaluating_atoms() {
        assert_eq!(eval("42").unwrap(), Value::Number(42.0));
        assert_eq!(eval("\"hi\"").unwrap(), Value::string("hi"));
        assert_eq!(eval("true").unwrap(), Value::Boolean(true));
        assert_eq!(eval("()").unwrap(), Value::Nil);
        assert_eq!(eval("").unwrap(), Value::Nil);
    }

    #[test]
    fn test_top_level_forms_return_last() {
        assert_eq!(eval("1 2 3").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_quote() {
        assert_eq!(eval("(quote a)").unwrap(), Value::Symbol("a".to_string()));
        assert_eq!(eval("'(1 (b))").unwrap().to_string(), "(1 (b))");
        assert_eq!(eval("'()").unwrap(), Value::Nil);
        assert!(matches!(
            eval("(quote a b)"),
            Err(Error::IllFormedSpecialForm { .. })
        ));
        assert!(matches!(
            eval("(quote)"),
            Err(Error::IllFormedSpecialForm { .. })
        ));
    }

    #[test]
    fn test_define_and_lookup() {
        let mut evaluator = LispEvaluator::new();
        assert_eq!(
            eval_str(&mut evaluator, "(define x 5)").unwrap(),
            Value::Symbol("x".to_string())
        );
        assert_eq!(eval_str(&mut evaluator, "x").unwrap(), Value::Number(5.0));

        eval_str(&mut evaluator, "(define y)").unwrap();
        assert_eq!(eval_str(&mut evaluator, "y").unwrap(), Value::Nil);
    }

    #[test]
    fn test_define_rejects_bad_shapes() {
        for source in ["(define)", "(define 1 2)", "(define x 1 2)", "(define (f) 1)"] {
            assert!(
                matches!(eval(source), Err(Error::IllFormedSpecialForm { .. })),
                "{} should be ill-formed",
                source
            );
        }
    }

    #[test]
    fn test_ill_formed_reports_form() {
        assert_eq!(
            eval("(if 1)").unwrap_err().to_string(),
            "Ill-formed special form: (if 1)"
        );
    }

    #[test]
    fn test_set() {
        let mut evaluator = LispEvaluator::new();
        eval_str(&mut evaluator, "(define x 5)").unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(set! x 6)").unwrap(),
            Value::Number(6.0)
        );
        assert_eq!(eval_str(&mut evaluator, "x").unwrap(), Value::Number(6.0));

        assert_eq!(
            eval_str(&mut evaluator, "(set! y 1)"),
            Err(Error::UnboundVariable {
                name: "y".to_string()
            })
        );
        assert!(matches!(
            eval_str(&mut evaluator, "(set! x)"),
            Err(Error::IllFormedSpecialForm { .. })
        ));
    }

    #[test]
    fn test_set_unbound_does_not_evaluate_value() {
        let mut evaluator = LispEvaluator::new();
        eval_str(&mut evaluator, "(define hits 0)").unwrap();
        assert!(eval_str(&mut evaluator, "(set! missing (set! hits 1))").is_err());
        assert_eq!(eval_str(&mut evaluator, "hits").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_set_in_procedure_mutates_outer_binding() {
        let mut evaluator = LispEvaluator::new();
        eval_str(
            &mut evaluator,
            "(define count 0) (define bump (lambda () (set! count (+ count 1))))",
        )
        .unwrap();
        eval_str(&mut evaluator, "(bump) (bump)").unwrap();
        assert_eq!(eval_str(&mut evaluator, "count").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_if() {
        assert_eq!(
            eval("(if (> 3 2) \"yes\" \"no\")").unwrap(),
            Value::string("yes")
        );
        assert_eq!(eval("(if (< 3 2) \"yes\")").unwrap(), Value::Nil);
        assert_eq!(eval("(if 0 1 2)").unwrap(), Value::Number(1.0));
        assert_eq!(eval("(if '() 1 2)").unwrap(), Value::Number(2.0));
        assert!(eval("(if 1 2 3 4)").is_err());
    }

    #[test]
    fn test_begin() {
        assert_eq!(eval("(begin)").unwrap(), Value::Nil);
        assert_eq!(
            eval("(begin (define a 1) (+ a 1))").unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_lambda_application() {
        assert_eq!(
            eval("((lambda (x y) (+ x y)) 2 3)").unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(
            eval("((lambda (x y) (+ x y)) 2)"),
            Err(Error::ArityMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(eval("((lambda () 7))").unwrap(), Value::Number(7.0));
    }

    #[test]
    fn test_lambda_shapes() {
        for source in [
            "(lambda (x))",
            "(lambda x x)",
            "(lambda (1) 1)",
            "(lambda (x x) x)",
        ] {
            assert!(
                matches!(eval(source), Err(Error::IllFormedSpecialForm { .. })),
                "{} should be ill-formed",
                source
            );
        }
    }

    #[test]
    fn test_closures_capture_scope() {
        let mut evaluator = LispEvaluator::new();
        eval_str(
            &mut evaluator,
            "(define make-adder (lambda (n) (lambda (x) (+ x n))))",
        )
        .unwrap();
        eval_str(&mut evaluator, "(define add5 (make-adder 5))").unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(add5 10)").unwrap(),
            Value::Number(15.0)
        );
        // Parameters never leak into the root scope
        assert!(eval_str(&mut evaluator, "n").is_err());
    }

    #[test]
    fn test_recursion() {
        let mut evaluator = LispEvaluator::new();
        eval_str(
            &mut evaluator,
            "(define fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1))))))",
        )
        .unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(fact 5)").unwrap(),
            Value::Number(120.0)
        );
    }

    #[test]
    fn test_not_applicable() {
        assert_eq!(
            eval("(1 2)"),
            Err(Error::NotApplicable {
                value: "1".to_string()
            })
        );
        assert!(matches!(
            eval("(\"f\")"),
            Err(Error::NotApplicable { .. })
        ));
    }

    #[test]
    fn test_unbound_operator() {
        assert_eq!(
            eval("(frobnicate 1)"),
            Err(Error::UnboundVariable {
                name: "frobnicate".to_string()
            })
        );
    }

    #[test]
    fn test_bindings_shadow_builtins() {
        let mut evaluator = LispEvaluator::new();
        eval_str(&mut evaluator, "(define + (lambda (a b) (* a b)))").unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(+ 3 4)").unwrap(),
            Value::Number(12.0)
        );
    }

    #[test]
    fn test_builtins_are_not_values() {
        assert!(matches!(eval("car"), Err(Error::UnboundVariable { .. })));
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let mut evaluator = LispEvaluator::new();
        eval_str(&mut evaluator, "(define trail \"\")").unwrap();
        eval_str(
            &mut evaluator,
            "(define mark (lambda (s) (set! trail (string-append trail s))))",
        )
        .unwrap();
        eval_str(&mut evaluator, "(list (mark \"a\") (mark \"b\") (mark \"c\"))").unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "trail").unwrap(),
            Value::string("abc")
        );
    }

    #[test]
    fn test_execution_limit() {
        let mut evaluator = LispEvaluator::new();
        evaluator.set_execution_limit(100);
        eval_str(&mut evaluator, "(define loop (lambda (n) (loop (+ n 1))))").unwrap();

        assert_eq!(
            eval_str(&mut evaluator, "(loop 0)"),
            Err(Error::ExecutionLimitExceeded { limit: 100 })
        );

        // The evaluator stays usable and the depth counter unwinds
        assert_eq!(evaluator.depth, 0);
        assert_eq!(eval_str(&mut evaluator, "(+ 1 1)").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_default_limit_allows_bounded_recursion() {
        let mut evaluator = LispEvaluator::new();
        eval_str(
            &mut evaluator,
            "(define count-down (lambda (n) (if (= n 0) \"done\" (count-down (- n 1)))))",
        )
        .unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(count-down 50)").unwrap(),
            Value::string("done")
        );
    }

    #[test]
    fn test_limit_counts_nested_forms() {
        let mut evaluator = LispEvaluator::new();
        evaluator.set_execution_limit(2);
        // (+ 1 2) is one form, each literal another
        assert!(eval_str(&mut evaluator, "(+ 1 2)").is_ok());
        assert!(eval_str(&mut evaluator, "(+ 1 (+ 2 3))").is_err());
    }

    #[test]
    fn test_large_limit_is_capped() {
        let mut evaluator = LispEvaluator::new();
        evaluator.set_execution_limit(10_000);
        assert_eq!(evaluator.execution_limit(), 10_000);
        assert_eq!(evaluator.effective_limit(), MAX_EVAL_DEPTH);

        eval_str(&mut evaluator, "(define loop (lambda (n) (loop (+ n 1))))").unwrap();
        assert_eq!(
            eval_str(&mut evaluator, "(loop 0)"),
            Err(Error::ExecutionLimitExceeded {
                limit: MAX_EVAL_DEPTH
            })
        );
        assert_eq!(evaluator.depth, 0);
    }

    #[test]
    fn test_runaway_without_limit_fails_cleanly() {
        let mut evaluator = LispEvaluator::new();
        assert_eq!(evaluator.effective_limit(), MAX_EVAL_DEPTH);
        eval_str(
            &mut evaluator,
            "(define grow (lambda (n) (+ 1 (grow n)))) (define spin (lambda () (spin)))",
        )
        .unwrap();

        for source in ["(grow 0)", "(spin)", "(list 1 (grow 0))"] {
            assert_eq!(
                eval_str(&mut evaluator, source),
                Err(Error::ExecutionLimitExceeded {
                    limit: MAX_EVAL_DEPTH
                }),
                "{} should hit the cap",
                source
            );
        }
        assert_eq!(eval_str(&mut evaluator, "(+ 1 1)").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_deepest_readable_form_evaluates() {
        let depth = crate::MAX_PARSE_DEPTH;
        let source = format!("{}0{}", "(+ 1 ".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&source).unwrap(), Value::Number(depth as f64));
    }

    #[test]
    fn test_with_config() {
        let config = InterpreterConfig {
            execution_limit: 7,
        };
        assert_eq!(LispEvaluator::with_config(&config).execution_limit(), 7);
    }
}
