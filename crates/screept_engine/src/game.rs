use std::collections::{HashMap, VecDeque};

use screept_ast::ast::{Expr, Stmt};
use screept_interp::Environment;

/// Session state shared by every dialog: the script environment plus
/// the navigation stack, front = currently shown dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub environment: Environment,
    pub dialog_stack: VecDeque<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub id: String,
    pub text: Expr,
    pub options: Vec<DialogOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogOption {
    pub id: String,
    pub text: Expr,
    /// Absent means always visible.
    pub condition: Option<Expr>,
    pub actions: Vec<DialogAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    GoBack,
    GoDialog(String),
    RunScreept(Stmt),
    Message(Expr),
    Conditional {
        cond: Expr,
        then_actions: Vec<DialogAction>,
        else_actions: Vec<DialogAction>,
    },
    Block(Vec<DialogAction>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameDefinition {
    pub game_state: GameState,
    pub dialogs: HashMap<String, Dialog>,
}
