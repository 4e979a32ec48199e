use std::path::{Path, PathBuf};

use crate::core::config::AliasTable;
use crate::highlight::SyntaxHighlighter;
use crate::input::HistoryLog;
use crate::path::PathExpander;
use crate::process::InterruptFlag;

/// Everything a command may read or mutate. Owned by the interpreter and
/// lent to each builtin for the duration of one call.
pub struct ShellState {
    pub cwd: PathBuf,
    pub paths: PathExpander,
    pub aliases: AliasTable,
    pub history: HistoryLog,
    pub highlighter: SyntaxHighlighter,
    pub interrupt: InterruptFlag,
    pub running: bool,
}

impl ShellState {
    pub fn new(cwd: PathBuf, home: Option<PathBuf>, aliases: AliasTable, history: HistoryLog) -> Self {
        ShellState {
            cwd,
            paths: PathExpander::new(home),
            aliases,
            history,
            highlighter: SyntaxHighlighter::new(),
            interrupt: InterruptFlag::new(),
            running: true,
        }
    }

    pub fn with_highlighter(mut self, highlighter: SyntaxHighlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn home(&self) -> Option<&Path> {
        self.paths.home()
    }

    pub fn resolve(&self, arg: &str) -> PathBuf {
        self.paths.resolve(&self.cwd, arg)
    }
}
