use log::debug;
use signal_hook::consts::signal::{SIGINT, SIGQUIT};
use signal_hook::flag;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Installs handlers for the interactive shell:
/// - SIGINT (Ctrl-C) and SIGQUIT (Ctrl-\) raise the returned flag instead of
///   killing the shell. The foreground child, being in the same process
///   group, still receives them with its default disposition, since `exec`
///   resets caught signals.
pub fn install_signal_handlers() -> io::Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGQUIT] {
        flag::register(signal, Arc::clone(&interrupted))?;
        debug!("handler installed for signal {}", signal);
    }
    Ok(interrupted)
}
