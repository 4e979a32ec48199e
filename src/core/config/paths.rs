use std::path::{Path, PathBuf};

use super::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".minishell_config.json";
pub const HISTORY_FILE_NAME: &str = ".minishell_history";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub history_path: PathBuf,
}

impl ConfigPaths {
    /// Explicit paths win. A home directory is needed only for the
    /// defaults that were not overridden.
    pub fn resolve(
        home: Option<&Path>,
        config: Option<PathBuf>,
        history: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let under_home = |name: &str| {
            home.map(|dir| dir.join(name))
                .ok_or(ConfigError::HomeDirNotFound)
        };
        let config_path = match config {
            Some(path) => path,
            None => under_home(CONFIG_FILE_NAME)?,
        };
        let history_path = match history {
            Some(path) => path,
            None => under_home(HISTORY_FILE_NAME)?,
        };
        Ok(ConfigPaths {
            config_path,
            history_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_home() {
        let paths = ConfigPaths::resolve(Some(Path::new("/home/testuser")), None, None)
            .expect("paths");
        assert_eq!(
            paths.config_path,
            PathBuf::from("/home/testuser/.minishell_config.json")
        );
        assert_eq!(
            paths.history_path,
            PathBuf::from("/home/testuser/.minishell_history")
        );
    }

    #[test]
    fn test_overrides() {
        let paths = ConfigPaths::resolve(
            Some(Path::new("/home/u")),
            Some(PathBuf::from("/tmp/c.json")),
            None,
        )
        .expect("paths");
        assert_eq!(paths.config_path, PathBuf::from("/tmp/c.json"));
        assert_eq!(paths.history_path, PathBuf::from("/home/u/.minishell_history"));
    }

    #[test]
    fn test_overrides_need_no_home() {
        let paths = ConfigPaths::resolve(
            None,
            Some(PathBuf::from("/tmp/c.json")),
            Some(PathBuf::from("/tmp/h")),
        )
        .expect("paths");
        assert_eq!(paths.config_path, PathBuf::from("/tmp/c.json"));
        assert_eq!(paths.history_path, PathBuf::from("/tmp/h"));
    }

    #[test]
    fn test_default_without_home_fails() {
        let err = ConfigPaths::resolve(None, Some(PathBuf::from("/tmp/c.json")), None)
            .expect_err("history default needs home");
        assert!(matches!(err, ConfigError::HomeDirNotFound));
    }
}
