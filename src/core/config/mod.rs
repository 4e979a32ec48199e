use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod aliases;
mod paths;

pub use aliases::AliasTable;
pub use paths::ConfigPaths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// On-disk shape of the config file. Unknown fields are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// JSON config file, read at startup and overwritten wholesale on save.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ConfigRecord, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, starting empty", self.path.display());
                return Ok(ConfigRecord::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: ConfigRecord =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "loaded {} alias(es) from {}",
            record.aliases.len(),
            self.path.display()
        );
        Ok(record)
    }

    pub fn save(&self, record: &ConfigRecord) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json + "\n").map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("saved config to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let file = ConfigFile::new(dir.path().join("absent.json"));
        assert_eq!(file.load().expect("load"), ConfigRecord::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("tempdir");
        let file = ConfigFile::new(dir.path().join("config.json"));

        let mut record = ConfigRecord::default();
        record.aliases.insert("ll".to_string(), "ls -la".to_string());
        file.save(&record).expect("save");

        let raw = fs::read_to_string(file.path()).expect("read");
        assert!(raw.contains("\"aliases\""));
        assert_eq!(file.load().expect("load"), record);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"aliases": {"g": "git"}, "theme": "dark"}"#).expect("write");

        let record = ConfigFile::new(&path).load().expect("load");
        assert_eq!(record.aliases.get("g").map(String::as_str), Some("git"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(
            ConfigFile::new(&path).load(),
            Err(ConfigError::Parse { .. })
        ));
    }
}
