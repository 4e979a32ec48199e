use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::HistoryError;

pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn load_entries(&self) -> Result<Vec<String>, HistoryError> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.read_error(e)),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.read_error(e))?;
            let line = line.trim();
            if !line.is_empty() {
                entries.push(line.to_string());
            }
        }
        Ok(entries)
    }

    /// Overwrites the file with `entries`, one per line.
    pub fn write_entries<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), HistoryError> {
        let file = fs::File::create(&self.file_path).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{}", entry).map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))
    }

    fn read_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Read {
            path: self.file_path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Write {
            path: self.file_path.clone(),
            source,
        }
    }
}
