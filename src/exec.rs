use crate::builtins::Builtin;
use crate::error::{BuiltinError, LaunchError};
use crate::host::Host;
use log::debug;
use nix::errno::Errno;
use nix::libc;
use nix::unistd::{fork, write, ForkResult, Pid};
use std::ffi::{CString, OsStr};
use std::io::Write;
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::ptr;

/// Exit code of a child whose program could not be executed.
pub const EXEC_FAILURE: i32 = 127;

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Continue,
    ExitRequested(u8),
    FatalError,
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Exited(i32),
    /// Raw signal number, real-time signals included.
    Signaled(i32),
}

/// Runs one parsed command line.
///
/// Builtins run in-process with `out` as their standard output; anything
/// else is launched through `host`. Errors are reported on `err` as
/// `msh: <command>: <reason>` and never end the shell, except a failure to
/// write a builtin's own output.
pub fn execute(
    argv: &[&OsStr],
    host: &mut dyn Host,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> ExecutionStatus {
    let Some(&program) = argv.first() else {
        return ExecutionStatus::Continue;
    };
    let name = program.to_string_lossy();

    if let Some(builtin) = program.to_str().and_then(Builtin::lookup) {
        debug!("builtin {:?} with {} argument(s)", builtin, argv.len() - 1);
        return match builtin.run(argv, host, out) {
            Ok(status) => status,
            Err(BuiltinError::Output(e)) => {
                report(err, &name, &e);
                ExecutionStatus::FatalError
            }
            Err(e) => {
                report(err, &name, &e);
                ExecutionStatus::Continue
            }
        };
    }

    // The child shares our stdout; anything still buffered must go first.
    if let Err(e) = out.flush() {
        report(err, &name, &e);
        return ExecutionStatus::FatalError;
    }
    match host.launch(argv) {
        Ok(ChildStatus::Exited(code)) => debug!("{} exited with status {}", name, code),
        Ok(ChildStatus::Signaled(signal)) => debug!("{} terminated by signal {}", name, signal),
        Err(e) => report(err, &name, &e),
    }
    ExecutionStatus::Continue
}

fn report(err: &mut dyn Write, name: &str, reason: &dyn std::fmt::Display) {
    // Nowhere left to complain if stderr itself is gone.
    let _ = writeln!(err, "msh: {}: {}", name, reason);
}

/// Forks, executes `argv` in the child using the search path, and waits for
/// the child to exit or be killed. Stops and continues are not terminal.
pub fn spawn_and_wait(argv: &[&OsStr]) -> Result<ChildStatus, LaunchError> {
    if argv.is_empty() {
        return Err(LaunchError::Empty);
    }
    // Everything the child needs is allocated before the fork: the child of
    // a multi-threaded process must not touch the allocator.
    let args = argv
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;
    let ptrs: Vec<*const c_char> = args
        .iter()
        .map(|arg| arg.as_ptr())
        .chain(Some(ptr::null()))
        .collect();

    match unsafe { fork() }.map_err(LaunchError::Fork)? {
        ForkResult::Child => exec_child(&args[0], &ptrs),
        ForkResult::Parent { child } => {
            debug!("launched {:?} as pid {}", argv[0], child);
            wait_for(child)
        }
    }
}

/// `ptrs` is the null-terminated argument array, `program` included.
fn exec_child(program: &CString, ptrs: &[*const c_char]) -> ! {
    unsafe { libc::execvp(program.as_ptr(), ptrs.as_ptr()) };
    let errno = Errno::last();
    // Only async-signal-safe calls between here and _exit.
    let stderr = libc::STDERR_FILENO;
    let _ = write(stderr, b"msh: ");
    let _ = write(stderr, program.as_bytes());
    let _ = write(stderr, b": ");
    let _ = write(stderr, errno.desc().as_bytes());
    let _ = write(stderr, b"\n");
    unsafe { libc::_exit(EXEC_FAILURE) }
}

fn wait_for(child: Pid) -> Result<ChildStatus, LaunchError> {
    let mut status: libc::c_int = 0;
    loop {
        // Decoded by hand: nix refuses statuses carrying real-time signals.
        let waited = unsafe { libc::waitpid(child.as_raw(), &mut status, libc::WUNTRACED) };
        match Errno::result(waited) {
            Ok(_) if libc::WIFEXITED(status) => {
                return Ok(ChildStatus::Exited(libc::WEXITSTATUS(status)))
            }
            Ok(_) if libc::WIFSIGNALED(status) => {
                return Ok(ChildStatus::Signaled(libc::WTERMSIG(status)))
            }
            Ok(_) => debug!("pid {} not finished: status {:#x}", child, status),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(LaunchError::Wait(e)),
        }
    }
}
