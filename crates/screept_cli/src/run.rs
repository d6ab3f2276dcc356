use nu_ansi_term::Color;

use screept_ast::diagnostic::SourceMap;
use screept_interp::{Environment, Executor};
use screept_parser::parse_statement;

/// Execute a script file (one statement, typically a block) against a
/// fresh environment. Returns the process exit code on failure.
pub fn run_script_file(path: &str) -> Result<(), i32> {
    let source = std::fs::read_to_string(path).map_err(|err| {
        eprintln!("cannot read '{}': {}", path, err);
        1
    })?;

    let stmt = match parse_statement(&source) {
        Ok(stmt) => stmt,
        Err(diags) => {
            let map = SourceMap::new(&source);
            for diag in &diags {
                eprintln!("{}", map.render(diag));
            }
            return Err(1);
        }
    };

    let mut env = Environment::new();
    let mut executor = Executor::new();
    let output_before = env.output.len();
    let result = executor.execute(&stmt, &mut env, &mut |emitted| {
        println!("{}", Color::DarkGray.paint(format!("[emit] {}", emitted)));
    });
    for printed in &env.output[output_before..] {
        println!("{}", printed);
    }
    result.map_err(|err| {
        eprintln!("{}", Color::Red.paint(err.to_string()));
        1
    })
}
