//! Line REPL for tinylisp
//!
//! Each input line is evaluated against one persistent interpreter. Lines
//! starting with `:` are commands:
//!
//! - `:ast <expr>` - print the parsed program as JSON
//! - `:quit` - exit

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Context;
use tinylisp::{Error, Interpreter, InterpreterConfig};

fn main() -> anyhow::Result<()> {
    let mut interp = Interpreter::with_config(InterpreterConfig::from_env());

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        println!("tinylisp {} (:quit to exit)", tinylisp::VERSION);
    }

    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            stdout.flush().context("failed to flush prompt")?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read stdin")?;
        let line = line.trim();

        match line {
            "" => continue,
            ":quit" => break,
            _ => {}
        }

        if let Some(source) = line.strip_prefix(":ast") {
            match Interpreter::parse(source) {
                Ok(program) => println!("{}", serde_json::to_string_pretty(&program)?),
                Err(e) => report(&e),
            }
            continue;
        }

        match interp.eval_to_string(line) {
            Ok(printed) => println!("{}", printed),
            Err(e) => report(&e),
        }
    }

    Ok(())
}

fn report(error: &Error) {
    if error.is_syntax() {
        eprintln!("read error: {}", error);
    } else {
        eprintln!("error: {}", error);
    }
}
