use std::io::{self, BufRead, Write};

use nu_ansi_term::Color;

use screept_engine::{load_game, Choice, EngineError, Rendered, Session};

/// Drive a dialog session over stdin/stdout until end of input.
/// Returns the process exit code on failure.
pub fn play_game_file(path: &str) -> Result<(), i32> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        eprintln!("cannot read '{}': {}", path, err);
        1
    })?;
    let definition = load_game(&text).map_err(|err| {
        eprintln!("cannot load '{}': {}", path, err);
        1
    })?;

    let mut session = Session::new(definition);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match session.render() {
            Ok(rendered) => print_rendered(&rendered),
            Err(err) => return fatal(err),
        }

        print!("> ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            // End of input ends the session.
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.choose(&line, &mut |emitted| {
            println!("{}", Color::DarkGray.paint(format!("[emit] {}", emitted)));
        }) {
            Ok(Choice::Invalid) => {
                println!("{}", Color::Yellow.paint("pick one of the listed numbers"));
            }
            Ok(Choice::Taken(report)) => {
                for printed in &report.printed {
                    println!("{}", printed);
                }
                for message in &report.messages {
                    println!("{}", Color::Cyan.paint(message.as_str()));
                }
                for error in &report.errors {
                    eprintln!("{}", Color::Red.paint(error.as_str()));
                }
            }
            Err(err) => return fatal(err),
        }
        println!();
    }
}

fn print_rendered(rendered: &Rendered) {
    if let Some(status) = &rendered.status {
        println!("{}", Color::Green.paint(status.as_str()));
    }
    for line in &rendered.lines {
        println!("{}", line);
    }
    for (i, option) in rendered.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option.text);
    }
}

fn fatal(err: EngineError) -> Result<(), i32> {
    eprintln!("{}", Color::Red.paint(format!("session ended: {}", err)));
    Err(1)
}
