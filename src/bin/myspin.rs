/*
 * myspin.rs - Keeps the shell waiting
 *
 * usage: myspin <n>
 * Sleeps for <n> seconds in 1-second chunks, then exits normally.
 */

use std::env;
use std::process;
use std::thread;
use std::time::Duration;

fn main() {
    let args: Vec<String> = env::args().collect();

    let secs = match args.get(1).map(|arg| arg.parse::<u64>()) {
        Some(Ok(secs)) if args.len() == 2 => secs,
        _ => {
            eprintln!("Usage: {} <n>", args[0]);
            process::exit(2);
        }
    };

    for _ in 0..secs {
        thread::sleep(Duration::from_secs(1));
    }
}
