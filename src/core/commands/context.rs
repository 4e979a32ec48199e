use std::io::{BufRead, Write};
use std::path::PathBuf;

use log::debug;

use super::{CommandError, Outcome};
use crate::core::state::ShellState;
use crate::input::LineHistory;

/// Standard streams and line editor a command runs against.
pub struct Streams<'a> {
    pub stdin: &'a mut dyn BufRead,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
    pub editor: &'a mut dyn LineHistory,
}

/// What a builtin sees for one invocation.
pub struct Context<'a, 'io> {
    tool: &'static str,
    pub state: &'a mut ShellState,
    pub io: &'a mut Streams<'io>,
}

impl<'a, 'io> Context<'a, 'io> {
    pub fn new(tool: &'static str, state: &'a mut ShellState, io: &'a mut Streams<'io>) -> Self {
        Self { tool, state, io }
    }

    pub fn resolve(&self, arg: &str) -> PathBuf {
        self.state.resolve(arg)
    }

    /// Prints `tool: message` on the error stream.
    pub fn report(&mut self, err: &CommandError) {
        debug!("{} failed: {:?}", self.tool, err);
        let line = format!("{}: {}", self.tool, err);
        let line = self.state.highlighter.highlight_error(&line);
        let _ = writeln!(self.io.stderr, "{}", line);
    }

    pub fn finish(&mut self, result: Result<(), CommandError>) -> Outcome {
        match result {
            Ok(()) => Outcome::Success,
            Err(err) => {
                self.report(&err);
                Outcome::Failure(err.kind())
            }
        }
    }

    /// Reports every per-target failure. The outcome carries the kind of
    /// the first one.
    pub fn settle(&mut self, results: Vec<Result<(), CommandError>>) -> Outcome {
        let mut outcome = Outcome::Success;
        for err in results.into_iter().filter_map(Result::err) {
            self.report(&err);
            if outcome == Outcome::Success {
                outcome = Outcome::Failure(err.kind());
            }
        }
        outcome
    }

    /// True once after Ctrl-C was pressed; long walks poll this and stop.
    pub fn interrupted(&mut self) -> bool {
        if !self.state.interrupt.is_raised() {
            return false;
        }
        self.state.interrupt.reset();
        let _ = writeln!(self.io.stderr, "^C");
        true
    }
}
