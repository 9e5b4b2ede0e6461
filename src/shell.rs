use crate::error::ReadOutcome;
use crate::exec::{execute, ExecutionStatus};
use crate::host::Host;
use crate::parser::tokenize;
use crate::prompt;
use crate::reader::LineSource;
use log::debug;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit code after an unrecoverable error.
pub const FATAL_EXIT_CODE: i32 = 1;

/// How the main loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Normal(u8),
    Fatal,
}

impl Termination {
    pub fn code(self) -> i32 {
        match self {
            Termination::Normal(code) => i32::from(code),
            Termination::Fatal => FATAL_EXIT_CODE,
        }
    }
}

pub struct Shell<H, O, E> {
    host: H,
    out: O,
    err: E,
    emit_prompt: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl<H: Host, O: Write, E: Write> Shell<H, O, E> {
    pub fn new(host: H, out: O, err: E) -> Self {
        Shell {
            host,
            out,
            err,
            emit_prompt: true,
            interrupted: None,
        }
    }

    pub fn emit_prompt(mut self, emit_prompt: bool) -> Self {
        self.emit_prompt = emit_prompt;
        self
    }

    /// Flag raised by the SIGINT handler while a child runs.
    pub fn interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    /// Runs the main shell loop: prints the prompt (if enabled), reads a
    /// line, splits it and dispatches it, until `exit`, end of input or a
    /// fatal error.
    pub fn run(&mut self, source: &mut dyn LineSource) -> Termination {
        loop {
            if let Some(termination) = self.step(source) {
                debug!("shell finished: {:?}", termination);
                return termination;
            }
        }
    }

    /// One prompt/read/parse/dispatch cycle. The line and its tokens are
    /// dropped when this returns, whichever way it returns.
    fn step(&mut self, source: &mut dyn LineSource) -> Option<Termination> {
        let prompt = if self.emit_prompt {
            prompt::render(&self.host)
        } else {
            String::new()
        };

        let line = match source.read_line(&prompt) {
            Ok(line) => line,
            Err(ReadOutcome::EndOfFile) => {
                let _ = writeln!(self.out);
                let _ = self.out.flush();
                return Some(Termination::Normal(0));
            }
            Err(e) => {
                self.fatal(&e);
                return Some(Termination::Fatal);
            }
        };
        if line.is_empty() {
            return None;
        }

        let argv = match tokenize(&line) {
            Ok(argv) => argv,
            Err(e) => {
                self.fatal(&e);
                return Some(Termination::Fatal);
            }
        };
        if argv.is_empty() {
            return None;
        }
        debug!("argv: {:?}", argv);

        let status = execute(&argv, &mut self.host, &mut self.out, &mut self.err);
        if let Some(flag) = &self.interrupted {
            if flag.swap(false, Ordering::Relaxed) {
                let _ = writeln!(self.out);
            }
        }
        match status {
            ExecutionStatus::Continue => None,
            ExecutionStatus::ExitRequested(code) => Some(Termination::Normal(code)),
            ExecutionStatus::FatalError => Some(Termination::Fatal),
        }
    }

    fn fatal(&mut self, reason: &dyn std::fmt::Display) {
        let _ = writeln!(self.err, "msh: {}", reason);
    }
}
