use log::LevelFilter;
use std::path::PathBuf;
use std::process;

/// History file kept in the user's home directory.
pub const HISTORY_FILE: &str = ".msh_history";

pub fn print_usage(code: i32) -> ! {
    println!("Usage: msh [-hvp]");
    println!("   -h   Print this help message");
    println!("   -v   Enable verbose mode");
    println!("   -p   Do not print a command prompt");
    process::exit(code);
}

/// Logs go to stderr. `RUST_LOG` wins unless `-v` asked for debug output.
pub fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

pub fn history_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(HISTORY_FILE))
}
