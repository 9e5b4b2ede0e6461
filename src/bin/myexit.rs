/*
 * myexit.rs - Exits with a chosen status
 *
 * usage: myexit <code>
 * Lets tests check that a failing child does not end the shell.
 */

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|arg| arg.parse::<i32>()) {
        Some(Ok(code)) if args.len() == 2 => process::exit(code),
        _ => {
            eprintln!("Usage: {} <code>", args[0]);
            process::exit(2);
        }
    }
}
