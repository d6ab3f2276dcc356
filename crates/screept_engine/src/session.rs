use screept_ast::ast::{Expr, Identifier, Value};
use screept_interp::value::{as_text, truth_number};
use screept_interp::{evaluate, Environment, Executor};

use crate::game::{Dialog, DialogAction, GameDefinition, GameState};
use crate::EngineError;

/// Marker splitting dialog text into separate lines.
const LINE_BREAK: &str = "<nl>";

/// Variable holding the optional zero-argument status-line function.
const STATUS_LINE: &str = "__statusLine";

// ── Render output ──────────────────────────────────────────────

/// What the current dialog looks like. Presentation (prompts, colors,
/// numbering format) is the host's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: Option<String>,
    pub lines: Vec<String>,
    /// Options that survived their conditions, in dialog order.
    pub options: Vec<RenderedOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOption {
    pub text: String,
    /// Index into the dialog's full option list.
    pub index: usize,
}

// ── Turn outcome ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    /// Non-numeric or out-of-range input; state untouched, re-prompt.
    Invalid,
    Taken(TurnReport),
}

/// Everything a turn produced, for the host to surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    /// PRINT output appended during this turn.
    pub printed: Vec<String>,
    /// MESSAGE action texts, in execution order.
    pub messages: Vec<String>,
    /// Per-action failures; the session continues past them.
    pub errors: Vec<String>,
}

// ── Session ────────────────────────────────────────────────────

/// A running dialog session: the loaded dialogs plus the mutable game
/// state, driven by render/choose until end of input.
pub struct Session {
    dialogs: std::collections::HashMap<String, Dialog>,
    state: GameState,
    executor: Executor,
}

impl Session {
    pub fn new(definition: GameDefinition) -> Self {
        Self {
            dialogs: definition.dialogs,
            state: definition.game_state,
            executor: Executor::new(),
        }
    }

    pub fn with_seed(definition: GameDefinition, seed: u64) -> Self {
        Self {
            dialogs: definition.dialogs,
            state: definition.game_state,
            executor: Executor::with_seed(seed),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }

    pub fn current_dialog_id(&self) -> Option<&str> {
        self.state.dialog_stack.front().map(String::as_str)
    }

    fn current_dialog(&self) -> Result<&Dialog, EngineError> {
        let id = self
            .state
            .dialog_stack
            .front()
            .ok_or(EngineError::EmptyStack)?;
        self.dialogs
            .get(id)
            .ok_or_else(|| EngineError::UnknownDialog(id.clone()))
    }

    // ── Render ──────────────────────────────────────────────────

    /// Evaluate the current dialog into displayable form: status line
    /// first (when `__statusLine` holds a function), then the text
    /// split on `<nl>`, then the options whose conditions hold.
    pub fn render(&self) -> Result<Rendered, EngineError> {
        let dialog = self.current_dialog()?;
        let env = &self.state.environment;

        let status = match env.vars.get(STATUS_LINE) {
            Some(Value::Function(_)) => {
                let call = Expr::FuncCall {
                    id: Identifier::Literal(STATUS_LINE.to_string()),
                    args: vec![],
                };
                Some(as_text(&evaluate(&call, env)?))
            }
            _ => None,
        };

        let text = as_text(&evaluate(&dialog.text, env)?);
        let lines = text.split(LINE_BREAK).map(str::to_string).collect();

        let mut options = Vec::new();
        for (index, option) in dialog.options.iter().enumerate() {
            if let Some(condition) = &option.condition {
                if truth_number(&evaluate(condition, env)?) == 0.0 {
                    continue;
                }
            }
            options.push(RenderedOption {
                text: as_text(&evaluate(&option.text, env)?),
                index,
            });
        }

        Ok(Rendered {
            status,
            lines,
            options,
        })
    }

    // ── Choose ──────────────────────────────────────────────────

    /// Execute the player's 1-based pick from the currently visible
    /// options. Each top-level action runs inside its own failure
    /// boundary: a runtime error is reported in the turn report and
    /// the remaining actions still run. Stack underflow stays fatal.
    pub fn choose(
        &mut self,
        input: &str,
        emit: &mut dyn FnMut(&str),
    ) -> Result<Choice, EngineError> {
        let rendered = self.render()?;
        let Ok(pick) = input.trim().parse::<usize>() else {
            return Ok(Choice::Invalid);
        };
        if pick == 0 || pick > rendered.options.len() {
            return Ok(Choice::Invalid);
        }

        let dialog = self.current_dialog()?;
        let option_index = rendered.options[pick - 1].index;
        let option = &dialog.options[option_index];
        let option_id = option.id.clone();
        let actions = option.actions.clone();

        let mut report = TurnReport::default();
        let output_before = self.state.environment.output.len();

        for (i, action) in actions.iter().enumerate() {
            match self.apply_action(action, emit, &mut report) {
                Ok(()) => {}
                Err(EngineError::Runtime(err)) => {
                    report
                        .errors
                        .push(format!("option '{}', action {}: {}", option_id, i + 1, err));
                }
                Err(fatal) => return Err(fatal),
            }
        }

        report.printed = self.state.environment.output[output_before..].to_vec();
        Ok(Choice::Taken(report))
    }

    /// Apply one action. Errors inside a nested list abort the rest of
    /// that list and surface to the caller's boundary.
    fn apply_action(
        &mut self,
        action: &DialogAction,
        emit: &mut dyn FnMut(&str),
        report: &mut TurnReport,
    ) -> Result<(), EngineError> {
        match action {
            DialogAction::GoDialog(id) => {
                self.state.dialog_stack.push_front(id.clone());
                Ok(())
            }

            DialogAction::GoBack => {
                self.state
                    .dialog_stack
                    .pop_front()
                    .ok_or(EngineError::StackUnderflow)?;
                Ok(())
            }

            DialogAction::RunScreept(stmt) => {
                self.executor
                    .execute(stmt, &mut self.state.environment, emit)?;
                Ok(())
            }

            DialogAction::Message(expr) => {
                let value = evaluate(expr, &self.state.environment)?;
                report.messages.push(as_text(&value));
                Ok(())
            }

            DialogAction::Conditional {
                cond,
                then_actions,
                else_actions,
            } => {
                let cond = evaluate(cond, &self.state.environment)?;
                let branch = if truth_number(&cond) != 0.0 {
                    then_actions
                } else {
                    else_actions
                };
                for action in branch {
                    self.apply_action(action, emit, report)?;
                }
                Ok(())
            }

            DialogAction::Block(actions) => {
                for action in actions {
                    self.apply_action(action, emit, report)?;
                }
                Ok(())
            }
        }
    }
}
