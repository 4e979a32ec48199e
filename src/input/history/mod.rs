mod file_ops;

use std::{io, path::PathBuf};

use log::debug;
use rustyline::error::ReadlineError;
use thiserror::Error;

use self::file_ops::FileOps;

/// Number of entries `history` shows without an explicit count.
pub const DEFAULT_WINDOW: usize = 50;

/// Entries kept on disk, matching the line editor's history size.
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Could not read history {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Could not write history {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Line editor history: {0}")]
    Editor(#[from] ReadlineError),
}

/// The line-editing facility's own history buffer.
pub trait LineHistory {
    fn add(&mut self, line: &str) -> Result<(), HistoryError>;
    fn clear(&mut self) -> Result<(), HistoryError>;
}

impl LineHistory for rustyline::DefaultEditor {
    fn add(&mut self, line: &str) -> Result<(), HistoryError> {
        self.add_history_entry(line)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.clear_history()?;
        Ok(())
    }
}

/// Editor stand-in used when no interactive editor is attached.
#[derive(Debug, Default)]
pub struct DetachedEditor {
    pub lines: Vec<String>,
}

impl LineHistory for DetachedEditor {
    fn add(&mut self, line: &str) -> Result<(), HistoryError> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.lines.clear();
        Ok(())
    }
}

/// Append-only command history for one session.
pub struct HistoryLog {
    entries: Vec<String>,
    file_ops: Option<FileOps>,
    window: usize,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(history_file: PathBuf, window: usize) -> Result<Self, HistoryError> {
        let file_ops = FileOps::new(history_file);
        let entries = file_ops.load_entries()?;
        debug!(
            "loaded {} history entries from {}",
            entries.len(),
            file_ops.path().display()
        );

        Ok(HistoryLog {
            entries,
            file_ops: Some(file_ops),
            window,
            capacity: DEFAULT_CAPACITY,
        })
    }

    pub fn in_memory(window: usize) -> Self {
        HistoryLog {
            entries: Vec::new(),
            file_ops: None,
            window,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Appends `line` unless it is blank. Returns whether it was recorded.
    pub fn push(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }
        self.entries.push(line.to_string());
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// The most recent `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Overwrites the history file with the most recent entries.
    pub fn save(&self) -> Result<(), HistoryError> {
        let Some(file_ops) = &self.file_ops else {
            return Ok(());
        };
        file_ops.write_entries(self.recent(self.capacity))?;
        debug!(
            "saved {} history entries to {}",
            self.entries.len().min(self.capacity),
            file_ops.path().display()
        );
        Ok(())
    }
}
