use crate::error::BuiltinError;
use crate::exec::ExecutionStatus;
use crate::host::{Host, Identity};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::Write;
use std::num::IntErrorKind;
use std::path::Path;

/// Commands implemented inside the shell process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Cd,
    Help,
    Exit,
    Kill,
    Whoami,
}

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    Builtin::ALL
        .iter()
        .map(|&builtin| (builtin.name(), builtin))
        .collect()
});

impl Builtin {
    /// Registration order, as listed by `help`.
    pub const ALL: [Builtin; 5] = [
        Builtin::Cd,
        Builtin::Help,
        Builtin::Exit,
        Builtin::Kill,
        Builtin::Whoami,
    ];

    /// Exact, case-sensitive lookup by command name.
    pub fn lookup(name: &str) -> Option<Builtin> {
        BUILTINS.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Help => "help",
            Builtin::Exit => "exit",
            Builtin::Kill => "kill",
            Builtin::Whoami => "whoami",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Builtin::Cd => "cd <dir>",
            Builtin::Help => "help",
            Builtin::Exit => "exit [code]",
            Builtin::Kill => "kill <signal> <pid>",
            Builtin::Whoami => "whoami",
        }
    }

    /// Runs the builtin. `argv[0]` is the command name itself.
    pub fn run(
        self,
        argv: &[&OsStr],
        host: &mut dyn Host,
        out: &mut dyn Write,
    ) -> Result<ExecutionStatus, BuiltinError> {
        let args = argv.get(1..).unwrap_or_default();
        match self {
            Builtin::Cd => match args {
                [dir] => {
                    host.change_dir(Path::new(dir))?;
                    Ok(ExecutionStatus::Continue)
                }
                _ => Err(BuiltinError::Usage(self.usage())),
            },
            Builtin::Help => match args {
                [] => {
                    help(out)?;
                    Ok(ExecutionStatus::Continue)
                }
                _ => Err(BuiltinError::Usage(self.usage())),
            },
            Builtin::Exit => match args {
                [] => Ok(ExecutionStatus::ExitRequested(0)),
                [code] => {
                    let code = parse_number(code)?;
                    // Exit statuses keep only the low 8 bits.
                    Ok(ExecutionStatus::ExitRequested((code & 0xff) as u8))
                }
                _ => Err(BuiltinError::Usage(self.usage())),
            },
            Builtin::Kill => match args {
                [signal, pid] => {
                    let signal = parse_int(signal)?;
                    let pid = parse_int(pid)?;
                    host.send_signal(pid, signal)?;
                    Ok(ExecutionStatus::Continue)
                }
                _ => Err(BuiltinError::Usage(self.usage())),
            },
            Builtin::Whoami => match args {
                [] => match host.user_name(Identity::Effective)? {
                    Some(name) => {
                        writeln!(out, "{}", name)?;
                        Ok(ExecutionStatus::Continue)
                    }
                    None => Err(BuiltinError::UnknownUser(host.user_id(Identity::Effective))),
                },
                _ => Err(BuiltinError::Usage(self.usage())),
            },
        }
    }
}

/// Parses a decimal integer. Out-of-range values saturate at the bounds of
/// `i64`, the way `strtol` clamps to `LONG_MIN`/`LONG_MAX`.
fn parse_number(arg: &OsStr) -> Result<i64, BuiltinError> {
    let not_a_number = || BuiltinError::NotANumber(arg.to_string_lossy().into_owned());
    let text = arg.to_str().ok_or_else(not_a_number)?;
    match text.parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(not_a_number()),
        },
    }
}

/// Like [`parse_number`], clamped to the range of a C `int`.
fn parse_int(arg: &OsStr) -> Result<i32, BuiltinError> {
    let n = parse_number(arg)?;
    Ok(n.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
}

fn help(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "M-Shell")?;
    writeln!(out, "Type program names and arguments, and hit enter.")?;
    writeln!(out, "The following are built-in:")?;
    writeln!(out)?;
    for builtin in Builtin::ALL {
        writeln!(out, "{}", builtin.name())?;
    }
    writeln!(out)?;
    writeln!(out, "Use the man command for information on other programs.")?;
    writeln!(out)
}
