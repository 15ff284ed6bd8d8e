//! Interpreter configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable holding the default execution limit
pub const EXECUTION_LIMIT_VAR: &str = "TINYLISP_EXECUTION_LIMIT";

/// Tunables for an [`Interpreter`](crate::Interpreter)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Maximum nesting of form evaluations before `ExecutionLimitExceeded`
    /// (0 = only [`crate::MAX_EVAL_DEPTH`] applies)
    #[serde(default)]
    pub execution_limit: usize,
}

impl InterpreterConfig {
    /// Defaults overridden by `TINYLISP_EXECUTION_LIMIT` when it holds a
    /// non-negative integer
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(EXECUTION_LIMIT_VAR) {
            config.apply_execution_limit(&raw);
        }
        config
    }

    fn apply_execution_limit(&mut self, raw: &str) {
        match raw.trim().parse::<usize>() {
            Ok(limit) => self.execution_limit = limit,
            Err(e) => warn!(
                value = raw,
                "ignoring invalid {}: {}", EXECUTION_LIMIT_VAR, e
            ),
        }
    }
}
