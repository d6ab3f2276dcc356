use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use screept_ast::ast::{Stmt, Value};

use crate::env::Environment;
use crate::eval::{evaluate, resolve};
use crate::value::{as_number, as_text, truth_number};
use crate::RuntimeError;

/// Runs statements against a shared environment. Owns the RNG backing
/// RND so sessions can be seeded deterministically.
pub struct Executor {
    rng: StdRng,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Execute a statement. `emit` is the one-way channel out to the
    /// host, invoked only by EMIT.
    pub fn execute(
        &mut self,
        stmt: &Stmt,
        env: &mut Environment,
        emit: &mut dyn FnMut(&str),
    ) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Print(expr) => {
                let value = evaluate(expr, env)?;
                env.output.push(as_text(&value));
                Ok(())
            }

            // Statements run strictly in order in the same environment;
            // a block introduces no scope.
            Stmt::Block(body) => {
                for stmt in body {
                    self.execute(stmt, env, emit)?;
                }
                Ok(())
            }

            Stmt::Bind { id, value } => {
                let name = resolve(id, env)?;
                let value = evaluate(value, env)?;
                env.vars.insert(name, value);
                Ok(())
            }

            Stmt::ProcDef { id, body } => {
                let name = resolve(id, env)?;
                env.procedures.insert(name, (**body).clone());
                Ok(())
            }

            // Unlike function application there is no copy: arguments
            // are bound as `_0`, `_1`, … straight into the live
            // environment and persist after the call.
            Stmt::ProcRun { id, args } => {
                let name = resolve(id, env)?;
                let body = env.lookup_procedure(&name)?.clone();
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(evaluate(arg, env)?);
                }
                for (i, value) in values.into_iter().enumerate() {
                    env.vars.insert(format!("_{}", i), value);
                }
                self.execute(&body, env, emit)
            }

            Stmt::Rnd { id, min, max } => {
                let name = resolve(id, env)?;
                let min = as_number(&evaluate(min, env)?).floor() as i64;
                let max = as_number(&evaluate(max, env)?).floor() as i64;
                if min > max {
                    return Err(RuntimeError::new(format!(
                        "empty random range {}..{}",
                        min, max
                    )));
                }
                let value = self.rng.gen_range(min..=max);
                env.vars.insert(name, Value::Number(value as f64));
                Ok(())
            }

            // Numeric truthiness, not the conditional expression's
            // zero-equality rule: a text condition counts as 1.
            Stmt::If { cond, then, els } => {
                let cond = evaluate(cond, env)?;
                if truth_number(&cond) != 0.0 {
                    self.execute(then, env, emit)
                } else if let Some(els) = els {
                    self.execute(els, env, emit)
                } else {
                    Ok(())
                }
            }

            Stmt::Emit(expr) => {
                let value = evaluate(expr, env)?;
                emit(&as_text(&value));
                Ok(())
            }
        }
    }
}
