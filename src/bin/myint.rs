/*
 * myint.rs - A child that dies by a signal
 *
 * usage: myint [signo]
 * Sends itself <signo> (SIGINT by default) so the shell sees a
 * signal-terminated child instead of a normal exit.
 */

use nix::sys::signal::{kill, Signal};
use nix::unistd::getpid;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let signal = match args.get(1) {
        None => Signal::SIGINT,
        Some(arg) => match arg.parse::<i32>().map(Signal::try_from) {
            Ok(Ok(signal)) => signal,
            _ => {
                eprintln!("Usage: {} [signo]", args[0]);
                process::exit(2);
            }
        },
    };

    if let Err(err) = kill(getpid(), signal) {
        eprintln!("kill ({:?}) error: {}", signal, err);
        process::exit(1);
    }

    // Signals that merely stop or are ignored by default end up here.
    process::exit(0);
}
