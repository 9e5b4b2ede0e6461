mod builtins;
mod error;
mod exec;
mod host;
mod parser;
mod prompt;
mod reader;
mod shell;
mod signals;
mod utils;

use crate::host::SystemHost;
use crate::reader::{EditorReader, StreamReader};
use crate::shell::Shell;
use log::warn;
use std::env;
use std::io::{self, IsTerminal};
use std::process;

fn main() {
    // Everything that saves state on drop (the editor history) is gone by
    // the time we exit.
    let code = run();
    process::exit(code);
}

fn run() -> i32 {
    // Parse command-line arguments.
    let args: Vec<String> = env::args().collect();
    let mut emit_prompt = true;
    let mut verbose = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "-h" => utils::print_usage(0),
            "-v" => verbose = true,
            "-p" => emit_prompt = false,
            other => {
                eprintln!("msh: unknown option {}", other);
                utils::print_usage(1);
            }
        }
    }
    utils::init_logging(verbose);

    let mut shell = Shell::new(SystemHost, io::stdout(), io::stderr()).emit_prompt(emit_prompt);

    if emit_prompt && io::stdin().is_terminal() {
        match signals::install_signal_handlers() {
            Ok(flag) => shell = shell.interrupt_flag(flag),
            Err(err) => warn!("signal handlers not installed: {}", err),
        }
        match EditorReader::new(utils::history_path()) {
            Ok(mut editor) => return shell.run(&mut editor).code(),
            Err(err) => warn!("line editor unavailable, reading plain input: {}", err),
        }
    }

    let mut reader = StreamReader::new(io::stdin().lock(), io::stdout());
    shell.run(&mut reader).code()
}
