use std::process;

mod play;
mod repl;
mod run;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    match args.first().map(String::as_str) {
        None | Some("repl") => repl::run_repl(),

        Some("run") => {
            if args.len() != 2 {
                eprintln!("usage: screept run <script>");
                process::exit(1);
            }
            if let Err(code) = run::run_script_file(&args[1]) {
                process::exit(code);
            }
        }

        Some("play") => {
            if args.len() != 2 {
                eprintln!("usage: screept play <game.json>");
                process::exit(1);
            }
            if let Err(code) = play::play_game_file(&args[1]) {
                process::exit(code);
            }
        }

        Some(other) => {
            eprintln!("unknown subcommand: {}", other);
            eprintln!("usage: screept [repl | run <script> | play <game.json>]");
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("screept: the Screept interpreter and dialog-game player");
    println!();
    println!("usage:");
    println!("  screept                 start the interactive REPL");
    println!("  screept repl            same as above");
    println!("  screept run <script>    execute a Screept script file");
    println!("  screept play <game>     play a JSON game definition");
}
