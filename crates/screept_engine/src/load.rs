use std::collections::{HashMap, VecDeque};

use serde_json::{Map, Value as Json};

use screept_ast::ast::{BinOp, CmpOp, Expr, Identifier, Stmt, UnaryOp, Value};
use screept_interp::Environment;

use crate::game::{Dialog, DialogAction, DialogOption, GameDefinition, GameState};

// ── LoadError ──────────────────────────────────────────────────

/// A malformed or unrecognized game-definition fragment. `path` names
/// the offending location ("dialogs.start.options[0].condition").
/// Loading is all-or-nothing: no partial game is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    pub path: String,
    pub message: String,
}

impl LoadError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at {}: {}", self.path, self.message)
    }
}

impl std::error::Error for LoadError {}

// ── Entry point ────────────────────────────────────────────────

/// Parse a complete game definition from JSON text.
pub fn load_game(text: &str) -> Result<GameDefinition, LoadError> {
    let json: Json = serde_json::from_str(text)
        .map_err(|e| LoadError::new("json", format!("invalid JSON: {}", e)))?;
    let root = as_object(&json, "game")?;

    let game_state = decode_game_state(require(root, "gameState", "game")?, "gameState")?;

    let dialogs_json = as_object(require(root, "dialogs", "game")?, "dialogs")?;
    let mut dialogs = HashMap::new();
    for (id, dialog_json) in dialogs_json {
        let path = format!("dialogs.{}", id);
        dialogs.insert(id.clone(), decode_dialog(dialog_json, &path)?);
    }

    Ok(GameDefinition {
        game_state,
        dialogs,
    })
}

// ── JSON shape helpers ─────────────────────────────────────────

fn as_object<'a>(json: &'a Json, path: &str) -> Result<&'a Map<String, Json>, LoadError> {
    json.as_object()
        .ok_or_else(|| LoadError::new(path, format!("expected object, found {}", kind(json))))
}

fn as_array<'a>(json: &'a Json, path: &str) -> Result<&'a Vec<Json>, LoadError> {
    json.as_array()
        .ok_or_else(|| LoadError::new(path, format!("expected array, found {}", kind(json))))
}

fn as_str<'a>(json: &'a Json, path: &str) -> Result<&'a str, LoadError> {
    json.as_str()
        .ok_or_else(|| LoadError::new(path, format!("expected string, found {}", kind(json))))
}

fn as_number(json: &Json, path: &str) -> Result<f64, LoadError> {
    json.as_f64()
        .ok_or_else(|| LoadError::new(path, format!("expected number, found {}", kind(json))))
}

fn require<'a>(
    map: &'a Map<String, Json>,
    key: &str,
    path: &str,
) -> Result<&'a Json, LoadError> {
    map.get(key)
        .ok_or_else(|| LoadError::new(path, format!("missing field '{}'", key)))
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// A tagged object: `{"type": "...", ...}`.
fn tag<'a>(json: &'a Json, path: &str) -> Result<(&'a str, &'a Map<String, Json>), LoadError> {
    let map = as_object(json, path)?;
    let tag = as_str(require(map, "type", path)?, &format!("{}.type", path))?;
    Ok((tag, map))
}

// ── Screept fragments ──────────────────────────────────────────

fn decode_value(json: &Json, path: &str) -> Result<Value, LoadError> {
    let (tag, map) = tag(json, path)?;
    match tag {
        "number" => {
            let n = as_number(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Value::Number(n))
        }
        "text" => {
            let s = as_str(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Value::Text(s.to_string()))
        }
        "function" => {
            let body = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Value::Function(Box::new(body)))
        }
        other => Err(LoadError::new(
            path,
            format!("unknown value type '{}'", other),
        )),
    }
}

fn decode_identifier(json: &Json, path: &str) -> Result<Identifier, LoadError> {
    // A bare string is a literal name; computed names are tagged.
    if let Json::String(name) = json {
        return Ok(Identifier::Literal(name.clone()));
    }
    let (tag, map) = tag(json, path)?;
    match tag {
        "computed" => {
            let expr = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Identifier::Computed(Box::new(expr)))
        }
        other => Err(LoadError::new(
            path,
            format!("unknown identifier type '{}'", other),
        )),
    }
}

fn decode_bin_op(op: &str, path: &str) -> Result<BinOp, LoadError> {
    match op {
        "+" => Ok(BinOp::Add),
        "-" => Ok(BinOp::Sub),
        "*" => Ok(BinOp::Mul),
        "/" => Ok(BinOp::Div),
        "//" => Ok(BinOp::FloorDiv),
        other => Err(LoadError::new(
            path,
            format!("unknown binary operator '{}'", other),
        )),
    }
}

fn decode_unary_op(op: &str, path: &str) -> Result<UnaryOp, LoadError> {
    match op {
        "-" => Ok(UnaryOp::Neg),
        "!" => Ok(UnaryOp::Not),
        other => Err(LoadError::new(
            path,
            format!("unknown unary operator '{}'", other),
        )),
    }
}

fn decode_cmp_op(op: &str, path: &str) -> Result<CmpOp, LoadError> {
    match op {
        "==" => Ok(CmpOp::Eq),
        "<" => Ok(CmpOp::Lt),
        ">" => Ok(CmpOp::Gt),
        other => Err(LoadError::new(
            path,
            format!("unknown comparison operator '{}'", other),
        )),
    }
}

pub(crate) fn decode_expr(json: &Json, path: &str) -> Result<Expr, LoadError> {
    // A bare string is Screept source.
    if let Json::String(source) = json {
        return screept_parser::parse_expression(source).map_err(|diags| {
            LoadError::new(path, first_message("expression", source, &diags))
        });
    }

    let (tag_name, map) = tag(json, path)?;
    match tag_name {
        "number" | "text" | "function" => Ok(Expr::Literal(decode_value(json, path)?)),

        "var" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            Ok(Expr::Var(id))
        }

        "binary_op" => {
            let op_str = as_str(require(map, "op", path)?, &format!("{}.op", path))?;
            let op = decode_bin_op(op_str, &format!("{}.op", path))?;
            let lhs = decode_expr(require(map, "left", path)?, &format!("{}.left", path))?;
            let rhs = decode_expr(require(map, "right", path)?, &format!("{}.right", path))?;
            Ok(Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }

        "unary_op" => {
            let op_str = as_str(require(map, "op", path)?, &format!("{}.op", path))?;
            let op = decode_unary_op(op_str, &format!("{}.op", path))?;
            let operand =
                decode_expr(require(map, "operand", path)?, &format!("{}.operand", path))?;
            Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            })
        }

        "comparison" => {
            let op_str = as_str(require(map, "op", path)?, &format!("{}.op", path))?;
            let op = decode_cmp_op(op_str, &format!("{}.op", path))?;
            let lhs = decode_expr(require(map, "left", path)?, &format!("{}.left", path))?;
            let rhs = decode_expr(require(map, "right", path)?, &format!("{}.right", path))?;
            Ok(Expr::Comparison {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }

        "conditional" => {
            let cond = decode_expr(
                require(map, "condition", path)?,
                &format!("{}.condition", path),
            )?;
            let if_true = decode_expr(require(map, "then", path)?, &format!("{}.then", path))?;
            let if_false = decode_expr(require(map, "else", path)?, &format!("{}.else", path))?;
            Ok(Expr::Conditional {
                cond: Box::new(cond),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            })
        }

        "func_call" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            let args = decode_expr_list(require(map, "args", path)?, &format!("{}.args", path))?;
            Ok(Expr::FuncCall { id, args })
        }

        other => Err(LoadError::new(
            path,
            format!("unknown expression type '{}'", other),
        )),
    }
}

fn decode_expr_list(json: &Json, path: &str) -> Result<Vec<Expr>, LoadError> {
    let items = as_array(json, path)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_expr(item, &format!("{}[{}]", path, i)))
        .collect()
}

pub(crate) fn decode_stmt(json: &Json, path: &str) -> Result<Stmt, LoadError> {
    // A bare string is Screept source.
    if let Json::String(source) = json {
        return screept_parser::parse_statement(source).map_err(|diags| {
            LoadError::new(path, first_message("statement", source, &diags))
        });
    }

    let (tag_name, map) = tag(json, path)?;
    match tag_name {
        "print" => {
            let expr = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Stmt::Print(expr))
        }

        "block" => {
            let body = as_array(require(map, "body", path)?, &format!("{}.body", path))?;
            let body = body
                .iter()
                .enumerate()
                .map(|(i, item)| decode_stmt(item, &format!("{}.body[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Stmt::Block(body))
        }

        "bind" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            let value = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Stmt::Bind { id, value })
        }

        "proc_def" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            let body = decode_stmt(require(map, "body", path)?, &format!("{}.body", path))?;
            Ok(Stmt::ProcDef {
                id,
                body: Box::new(body),
            })
        }

        "proc_run" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            let args = decode_expr_list(require(map, "args", path)?, &format!("{}.args", path))?;
            Ok(Stmt::ProcRun { id, args })
        }

        "rnd" => {
            let id = decode_identifier(
                require(map, "identifier", path)?,
                &format!("{}.identifier", path),
            )?;
            let min = decode_expr(require(map, "min", path)?, &format!("{}.min", path))?;
            let max = decode_expr(require(map, "max", path)?, &format!("{}.max", path))?;
            Ok(Stmt::Rnd { id, min, max })
        }

        "if" => {
            let cond = decode_expr(
                require(map, "condition", path)?,
                &format!("{}.condition", path),
            )?;
            let then = decode_stmt(require(map, "then", path)?, &format!("{}.then", path))?;
            let els = match map.get("else") {
                Some(json) => Some(Box::new(decode_stmt(json, &format!("{}.else", path))?)),
                None => None,
            };
            Ok(Stmt::If {
                cond,
                then: Box::new(then),
                els,
            })
        }

        "emit" => {
            let expr = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(Stmt::Emit(expr))
        }

        other => Err(LoadError::new(
            path,
            format!("unknown statement type '{}'", other),
        )),
    }
}

fn first_message(
    what: &str,
    source: &str,
    diags: &[screept_ast::diagnostic::Diagnostic],
) -> String {
    let detail = diags
        .first()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| "syntax error".to_string());
    format!("invalid {} {:?}: {}", what, source, detail)
}

// ── Game entities ──────────────────────────────────────────────

fn decode_game_state(json: &Json, path: &str) -> Result<GameState, LoadError> {
    let map = as_object(json, path)?;

    let env_json = as_object(
        require(map, "screeptEnv", path)?,
        &format!("{}.screeptEnv", path),
    )?;
    let mut environment = Environment::new();

    let vars_path = format!("{}.screeptEnv.vars", path);
    let vars = as_object(require(env_json, "vars", &format!("{}.screeptEnv", path))?, &vars_path)?;
    for (name, value_json) in vars {
        let value = decode_value(value_json, &format!("{}.{}", vars_path, name))?;
        environment.vars.insert(name.clone(), value);
    }

    let procs_path = format!("{}.screeptEnv.procedures", path);
    let procs = as_object(
        require(env_json, "procedures", &format!("{}.screeptEnv", path))?,
        &procs_path,
    )?;
    for (name, stmt_json) in procs {
        let stmt = decode_stmt(stmt_json, &format!("{}.{}", procs_path, name))?;
        environment.procedures.insert(name.clone(), stmt);
    }

    let stack_path = format!("{}.dialogStack", path);
    let stack = as_array(require(map, "dialogStack", path)?, &stack_path)?;
    let mut dialog_stack = VecDeque::new();
    for (i, id) in stack.iter().enumerate() {
        dialog_stack.push_back(as_str(id, &format!("{}[{}]", stack_path, i))?.to_string());
    }

    Ok(GameState {
        environment,
        dialog_stack,
    })
}

fn decode_dialog(json: &Json, path: &str) -> Result<Dialog, LoadError> {
    let map = as_object(json, path)?;
    let id = as_str(require(map, "id", path)?, &format!("{}.id", path))?.to_string();
    let text = decode_expr(require(map, "text", path)?, &format!("{}.text", path))?;

    let options_path = format!("{}.options", path);
    let options_json = as_array(require(map, "options", path)?, &options_path)?;
    let mut options = Vec::with_capacity(options_json.len());
    for (i, option_json) in options_json.iter().enumerate() {
        options.push(decode_option(
            option_json,
            &format!("{}[{}]", options_path, i),
        )?);
    }

    Ok(Dialog { id, text, options })
}

fn decode_option(json: &Json, path: &str) -> Result<DialogOption, LoadError> {
    let map = as_object(json, path)?;
    let id = as_str(require(map, "id", path)?, &format!("{}.id", path))?.to_string();
    let text = decode_expr(require(map, "text", path)?, &format!("{}.text", path))?;

    let condition = match map.get("condition") {
        Some(json) => Some(decode_expr(json, &format!("{}.condition", path))?),
        None => None,
    };

    let actions_path = format!("{}.actions", path);
    let actions_json = as_array(require(map, "actions", path)?, &actions_path)?;
    let mut actions = Vec::with_capacity(actions_json.len());
    for (i, action_json) in actions_json.iter().enumerate() {
        actions.push(decode_action(
            action_json,
            &format!("{}[{}]", actions_path, i),
        )?);
    }

    Ok(DialogOption {
        id,
        text,
        condition,
        actions,
    })
}

fn decode_action_list(json: &Json, path: &str) -> Result<Vec<DialogAction>, LoadError> {
    let items = as_array(json, path)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_action(item, &format!("{}[{}]", path, i)))
        .collect()
}

fn decode_action(json: &Json, path: &str) -> Result<DialogAction, LoadError> {
    let (tag_name, map) = tag(json, path)?;
    match tag_name {
        "go_back" => Ok(DialogAction::GoBack),

        "go_dialog" => {
            let dest = as_str(
                require(map, "destination", path)?,
                &format!("{}.destination", path),
            )?;
            Ok(DialogAction::GoDialog(dest.to_string()))
        }

        "screept" => {
            let stmt = decode_stmt(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(DialogAction::RunScreept(stmt))
        }

        "message" => {
            let expr = decode_expr(require(map, "value", path)?, &format!("{}.value", path))?;
            Ok(DialogAction::Message(expr))
        }

        "conditional" => {
            let cond = decode_expr(
                require(map, "condition", path)?,
                &format!("{}.condition", path),
            )?;
            let then_actions =
                decode_action_list(require(map, "then", path)?, &format!("{}.then", path))?;
            let else_actions = match map.get("else") {
                Some(json) => decode_action_list(json, &format!("{}.else", path))?,
                None => Vec::new(),
            };
            Ok(DialogAction::Conditional {
                cond,
                then_actions,
                else_actions,
            })
        }

        "block" => {
            let actions = decode_action_list(
                require(map, "actions", path)?,
                &format!("{}.actions", path),
            )?;
            Ok(DialogAction::Block(actions))
        }

        other => Err(LoadError::new(
            path,
            format!("unknown action type '{}'", other),
        )),
    }
}
