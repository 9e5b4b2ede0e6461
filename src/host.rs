//! Access to process-wide state: working directory, user identity, signal
//! delivery and program launch.
//!
//! Builtins, the dispatcher and the prompt only ever reach this state through
//! the [`Host`] trait, so they can be exercised without touching the real
//! process.

use crate::error::LaunchError;
use crate::exec::{self, ChildStatus};
use nix::errno::Errno;
use nix::libc;
use nix::unistd::{chdir, geteuid, getuid, Uid, User};
use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

/// Which of the process's user ids to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Real,
    Effective,
}

pub trait Host {
    fn current_dir(&self) -> io::Result<PathBuf>;

    fn change_dir(&mut self, dir: &Path) -> nix::Result<()>;

    fn user_id(&self, identity: Identity) -> u32;

    /// `Ok(None)` when the uid has no password database entry.
    fn user_name(&self, identity: Identity) -> nix::Result<Option<String>>;

    /// Sends signal number `signal` to `pid`. Signal 0 only checks that the
    /// target exists and may be signalled.
    fn send_signal(&mut self, pid: i32, signal: i32) -> nix::Result<()>;

    /// Runs `argv[0]` as a child process and blocks until it terminates.
    fn launch(&mut self, argv: &[&OsStr]) -> Result<ChildStatus, LaunchError>;
}

/// The real process.
#[derive(Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    fn uid(identity: Identity) -> Uid {
        match identity {
            Identity::Real => getuid(),
            Identity::Effective => geteuid(),
        }
    }
}

impl Host for SystemHost {
    fn current_dir(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }

    fn change_dir(&mut self, dir: &Path) -> nix::Result<()> {
        chdir(dir)
    }

    fn user_id(&self, identity: Identity) -> u32 {
        Self::uid(identity).as_raw()
    }

    fn user_name(&self, identity: Identity) -> nix::Result<Option<String>> {
        Ok(User::from_uid(Self::uid(identity))?.map(|user| user.name))
    }

    fn send_signal(&mut self, pid: i32, signal: i32) -> nix::Result<()> {
        // Raw numbers, so real-time signals nix has no variant for still go
        // through; the kernel decides what is valid.
        Errno::result(unsafe { libc::kill(pid, signal) }).map(drop)
    }

    fn launch(&mut self, argv: &[&OsStr]) -> Result<ChildStatus, LaunchError> {
        exec::spawn_and_wait(argv)
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;

    /// In-memory host that records what the shell asked of it.
    #[derive(Debug)]
    pub struct FakeHost {
        pub cwd: PathBuf,
        pub dirs: Vec<PathBuf>,
        pub user: Option<String>,
        pub live_pids: Vec<i32>,
        pub signals: Vec<(i32, i32)>,
        pub launched: Vec<Vec<String>>,
        pub status: ChildStatus,
    }

    impl Default for FakeHost {
        fn default() -> Self {
            FakeHost {
                cwd: PathBuf::from("/home/ada/src"),
                dirs: vec![PathBuf::from("/"), PathBuf::from("/tmp")],
                user: Some("ada".to_string()),
                live_pids: vec![42],
                signals: Vec::new(),
                launched: Vec::new(),
                status: ChildStatus::Exited(0),
            }
        }
    }

    impl Host for FakeHost {
        fn current_dir(&self) -> io::Result<PathBuf> {
            Ok(self.cwd.clone())
        }

        fn change_dir(&mut self, dir: &Path) -> nix::Result<()> {
            if self.dirs.iter().any(|d| d == dir) {
                self.cwd = dir.to_path_buf();
                Ok(())
            } else {
                Err(Errno::ENOENT)
            }
        }

        fn user_id(&self, _: Identity) -> u32 {
            1000
        }

        fn user_name(&self, _: Identity) -> nix::Result<Option<String>> {
            Ok(self.user.clone())
        }

        fn send_signal(&mut self, pid: i32, signal: i32) -> nix::Result<()> {
            if !(0..=64).contains(&signal) {
                return Err(Errno::EINVAL);
            }
            if !self.live_pids.contains(&pid) {
                return Err(Errno::ESRCH);
            }
            self.signals.push((pid, signal));
            Ok(())
        }

        fn launch(&mut self, argv: &[&OsStr]) -> Result<ChildStatus, LaunchError> {
            self.launched
                .push(argv.iter().map(|arg| arg.to_string_lossy().into_owned()).collect());
            Ok(self.status)
        }
    }
}
