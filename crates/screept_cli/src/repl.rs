use nu_ansi_term::Color;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};

use screept_ast::diagnostic::SourceMap;
use screept_interp::value::as_text;
use screept_interp::{evaluate, Environment, Executor};
use screept_parser::{parse_expression, parse_statement};

/// Custom prompt for the Screept REPL.
struct ScreeptPrompt;

impl Prompt for ScreeptPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(Color::Green.bold().paint("screept").to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("... > ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        std::borrow::Cow::Owned(format!("{}search: ", prefix))
    }
}

/// Build the history file path, creating parent directories if needed.
fn history_path() -> Option<std::path::PathBuf> {
    let data_dir = data_dir()?.join("screept");
    std::fs::create_dir_all(&data_dir).ok()?;
    Some(data_dir.join("history.txt"))
}

/// Get the XDG data directory or fall back to ~/.local/share.
fn data_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| std::path::PathBuf::from(h).join(".local/share"))
        })
}

/// One line of REPL input: expression first, statement as fallback.
/// `f(1)` prints its value; `x = 5` fails the expression parse and
/// lands on the bind statement.
fn eval_line(line: &str, env: &mut Environment, executor: &mut Executor) {
    match parse_expression(line) {
        Ok(expr) => match evaluate(&expr, env) {
            Ok(value) => println!("{}", value),
            Err(err) => eprintln!("{}", Color::Red.paint(err.to_string())),
        },
        Err(_) => match parse_statement(line) {
            Ok(stmt) => {
                let output_before = env.output.len();
                let result = executor.execute(&stmt, env, &mut |emitted| {
                    println!("{}", Color::DarkGray.paint(format!("[emit] {}", emitted)));
                });
                for printed in &env.output[output_before..] {
                    println!("{}", printed);
                }
                if let Err(err) = result {
                    eprintln!("{}", Color::Red.paint(err.to_string()));
                }
            }
            Err(diags) => {
                let map = SourceMap::new(line);
                for diag in &diags {
                    eprintln!("{}", map.render(diag));
                }
            }
        },
    }
}

pub fn run_repl() {
    let mut env = Environment::new();
    let mut executor = Executor::new();

    let mut line_editor = match history_path() {
        Some(path) => match FileBackedHistory::with_file(500, path) {
            Ok(history) => Reedline::create().with_history(Box::new(history)),
            Err(_) => Reedline::create(),
        },
        None => Reedline::create(),
    };

    println!("Screept REPL. Enter an expression or statement, ctrl-d to quit");

    loop {
        match line_editor.read_line(&ScreeptPrompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                eval_line(line, &mut env, &mut executor);
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("input error: {}", err);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screept_ast::ast::Value;

    #[test]
    fn statement_fallback_binds() {
        let mut env = Environment::new();
        let mut executor = Executor::with_seed(0);
        eval_line("x = 5", &mut env, &mut executor);
        assert_eq!(env.vars["x"], Value::Number(5.0));
    }

    #[test]
    fn nonsense_reports_without_panicking() {
        let mut env = Environment::new();
        let mut executor = Executor::with_seed(0);
        eval_line("PRINT", &mut env, &mut executor);
        assert!(env.vars.is_empty());
    }
}
