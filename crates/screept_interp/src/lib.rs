pub mod env;
pub mod eval;
pub mod exec;
pub mod value;

pub use env::Environment;
pub use eval::{evaluate, resolve};
pub use exec::Executor;

// ── RuntimeError ───────────────────────────────────────────────

/// A runtime error raised by the evaluator or executor: an unknown
/// identifier/procedure, a wrong value kind for an operation, or an
/// impossible random range. Never swallowed here; containment is the
/// host's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}
