pub mod game;
pub mod load;
pub mod session;

pub use game::{Dialog, DialogAction, DialogOption, GameDefinition, GameState};
pub use load::{load_game, LoadError};
pub use session::{Choice, Rendered, RenderedOption, Session, TurnReport};

use screept_interp::RuntimeError;

// ── EngineError ────────────────────────────────────────────────

/// Errors raised while driving a dialog session. Only `Runtime` is
/// contained by the per-action failure boundary; the rest are fatal to
/// the session.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Runtime(RuntimeError),
    UnknownDialog(String),
    /// Rendering with no dialog on the navigation stack.
    EmptyStack,
    /// GO BACK with nothing left to pop.
    StackUnderflow,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Runtime(err) => write!(f, "{}", err),
            EngineError::UnknownDialog(id) => write!(f, "unknown dialog '{}'", id),
            EngineError::EmptyStack => write!(f, "no dialog on the navigation stack"),
            EngineError::StackUnderflow => {
                write!(f, "navigation stack underflow: nothing to go back to")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<RuntimeError> for EngineError {
    fn from(err: RuntimeError) -> Self {
        EngineError::Runtime(err)
    }
}
