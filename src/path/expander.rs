use std::path::{Path, PathBuf};

/// Resolves command arguments against the shell's working directory and
/// handles the `~` shorthand for the home directory.
#[derive(Clone, Debug, Default)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl PathExpander {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Expands a leading `~` or `~/`. `~user` forms are left untouched.
    pub fn expand(&self, path: &str) -> PathBuf {
        match (path.strip_prefix('~'), &self.home) {
            (Some(""), Some(home)) => home.clone(),
            (Some(rest), Some(home)) if rest.starts_with('/') => {
                let mut home_path = home.clone();
                for part in rest.split('/').filter(|p| !p.is_empty()) {
                    home_path.push(part);
                }
                home_path
            }
            _ => PathBuf::from(path),
        }
    }

    /// `arg` relative to `cwd`; absolute arguments pass through.
    pub fn resolve(&self, cwd: &Path, arg: &str) -> PathBuf {
        cwd.join(arg)
    }

    /// Replaces a leading home directory with `~` for display.
    pub fn abbreviate(&self, path: &Path) -> String {
        if let Some(home) = &self.home {
            if let Ok(rest) = path.strip_prefix(home) {
                if rest.as_os_str().is_empty() {
                    return "~".to_string();
                }
                return format!("~/{}", rest.display());
            }
        }
        path.display().to_string()
    }
}
