use std::collections::TryReserveError;
use std::ffi::NulError;
use std::io;

use thiserror::Error;

/// Why `read_line` did not produce a line.
#[derive(Debug, Error)]
pub enum ReadOutcome {
    /// Clean end of input with nothing buffered. Not an error for the shell.
    #[error("end of input")]
    EndOfFile,
    #[error("out of memory while reading input")]
    AllocationFailure,
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),
}

impl From<TryReserveError> for ReadOutcome {
    fn from(_: TryReserveError) -> Self {
        ReadOutcome::AllocationFailure
    }
}

/// The tokenizer could not grow its argument storage.
#[derive(Debug, Error)]
#[error("out of memory while splitting arguments")]
pub struct AllocationFailure;

impl From<TryReserveError> for AllocationFailure {
    fn from(_: TryReserveError) -> Self {
        AllocationFailure
    }
}

/// Failures reported by builtin commands.
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{}", .0.desc())]
    Os(#[from] nix::Error),
    #[error("{0}: numeric argument required")]
    NotANumber(String),
    #[error("no user entry for uid {0}")]
    UnknownUser(u32),
    /// Writing the command's own output failed; the shell cannot go on.
    #[error("write error: {0}")]
    Output(#[from] io::Error),
}

/// Failures in the parent while launching or waiting on a child.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    Empty,
    #[error("argument contains a nul byte")]
    Nul(#[from] NulError),
    #[error("fork failed: {}", .0.desc())]
    Fork(nix::Error),
    #[error("wait failed: {}", .0.desc())]
    Wait(nix::Error),
}
