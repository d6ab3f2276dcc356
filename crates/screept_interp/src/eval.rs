use screept_ast::ast::{BinOp, CmpOp, Expr, Identifier, UnaryOp, Value};

use crate::env::Environment;
use crate::value::{as_number, as_text, truth_number, value_eq};
use crate::RuntimeError;

// ── Identifier resolution ──────────────────────────────────────

/// Resolve an identifier to its name: literal names verbatim, computed
/// identifiers by evaluating their expression and taking its text form.
pub fn resolve(id: &Identifier, env: &Environment) -> Result<String, RuntimeError> {
    match id {
        Identifier::Literal(name) => Ok(name.clone()),
        Identifier::Computed(expr) => Ok(as_text(&evaluate(expr, env)?)),
    }
}

// ── Expression evaluation ──────────────────────────────────────

/// Reduce an expression to a value. Expressions never mutate the
/// environment; function application works on a private clone.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),

        Expr::Var(id) => {
            let name = resolve(id, env)?;
            env.lookup_var(&name).cloned()
        }

        Expr::BinaryOp { op, lhs, rhs } => {
            let lhs = evaluate(lhs, env)?;
            let rhs = evaluate(rhs, env)?;
            Ok(eval_binop(*op, &lhs, &rhs))
        }

        Expr::UnaryOp { op, operand } => {
            let val = evaluate(operand, env)?;
            Ok(match op {
                UnaryOp::Neg => Value::Number(-as_number(&val)),
                UnaryOp::Not => {
                    if truth_number(&val) == 0.0 {
                        Value::Number(1.0)
                    } else {
                        Value::Number(0.0)
                    }
                }
            })
        }

        Expr::Comparison { op, lhs, rhs } => {
            let lhs = evaluate(lhs, env)?;
            let rhs = evaluate(rhs, env)?;
            let result = match op {
                CmpOp::Eq => value_eq(&lhs, &rhs),
                CmpOp::Lt => as_number(&lhs) < as_number(&rhs),
                CmpOp::Gt => as_number(&lhs) > as_number(&rhs),
            };
            Ok(Value::Number(if result { 1.0 } else { 0.0 }))
        }

        // Branches on value equality to Number(0), not numeric
        // truthiness, so a text condition always takes the true branch.
        // The IF statement uses the other rule; both are intentional.
        Expr::Conditional {
            cond,
            if_true,
            if_false,
        } => {
            let cond = evaluate(cond, env)?;
            if value_eq(&cond, &Value::Number(0.0)) {
                evaluate(if_false, env)
            } else {
                evaluate(if_true, env)
            }
        }

        Expr::FuncCall { id, args } => {
            let name = resolve(id, env)?;
            let body = match env.lookup_var(&name)? {
                Value::Function(body) => body.clone(),
                _ => {
                    return Err(RuntimeError::new(format!(
                        "'{}' is not a function",
                        name
                    )))
                }
            };
            // Arguments are evaluated against the caller's environment;
            // the body runs against a full copy with `_0`, `_1`, …
            // bound. The caller's environment is never touched.
            let mut scope = env.clone();
            for (i, arg) in args.iter().enumerate() {
                let value = evaluate(arg, env)?;
                scope.vars.insert(format!("_{}", i), value);
            }
            evaluate(&body, &scope)
        }
    }
}

fn eval_binop(op: BinOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        // `+` prefers numeric addition and falls back to text
        // concatenation when either side is not a number.
        BinOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            _ => Value::Text(format!("{}{}", as_text(lhs), as_text(rhs))),
        },
        // The remaining operators live in the numeric domain; division
        // by zero follows IEEE-754 (inf/NaN), not an error.
        BinOp::Sub => Value::Number(as_number(lhs) - as_number(rhs)),
        BinOp::Mul => Value::Number(as_number(lhs) * as_number(rhs)),
        BinOp::Div => Value::Number(as_number(lhs) / as_number(rhs)),
        BinOp::FloorDiv => Value::Number((as_number(lhs) / as_number(rhs)).floor()),
    }
}
