use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use super::ProcessError;

/// Runs external programs synchronously with the shell's own stdio.
#[derive(Clone, Debug, Default)]
pub struct ProcessExecutor {
    quiet_mode: bool,
}

impl ProcessExecutor {
    pub fn new(quiet_mode: bool) -> Self {
        ProcessExecutor { quiet_mode }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet_mode
    }

    /// Spawns `argv[0]` with the remaining arguments inside `cwd` and waits
    /// for it. A non-zero exit is reported as `ProcessError::Exited`.
    pub fn spawn_process(&self, argv: &[String], cwd: &Path) -> Result<(), ProcessError> {
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };
        debug!("spawning {} {:?} in {}", program, args, cwd.display());

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| launch_error(program, e))?;

        let status = child.wait().map_err(|source| ProcessError::Launch {
            command: program.clone(),
            source,
        })?;
        debug!("{} finished with {}", program, status);

        if status.success() {
            return Ok(());
        }

        let status = match status.code() {
            Some(code) => code.to_string(),
            None => status.to_string(),
        };
        Err(ProcessError::Exited {
            command: program.clone(),
            status,
        })
    }
}

fn launch_error(program: &str, err: io::Error) -> ProcessError {
    match err.kind() {
        io::ErrorKind::NotFound => ProcessError::CommandNotFound(program.to_string()),
        io::ErrorKind::PermissionDenied => ProcessError::PermissionDenied(program.to_string()),
        _ => ProcessError::Launch {
            command: program.to_string(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::ErrorKind;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_success() {
        let executor = ProcessExecutor::new(true);
        let cwd = std::env::temp_dir();
        assert!(executor.spawn_process(&argv(&["true"]), &cwd).is_ok());
    }

    #[test]
    fn test_non_zero_exit() {
        let executor = ProcessExecutor::default();
        let cwd = std::env::temp_dir();
        let err = executor
            .spawn_process(&argv(&["sh", "-c", "exit 3"]), &cwd)
            .expect_err("should fail");
        assert_eq!(err.to_string(), "sh: exited with status 3");
        assert_eq!(err.kind(), ErrorKind::GenericFailure);
    }

    #[test]
    fn test_command_not_found() {
        let executor = ProcessExecutor::default();
        let cwd = std::env::temp_dir();
        let err = executor
            .spawn_process(&argv(&["nonexistentcmd123"]), &cwd)
            .expect_err("should fail");
        assert!(matches!(err, ProcessError::CommandNotFound(_)));
        assert_eq!(err.to_string(), "nonexistentcmd123: command not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_runs_in_given_directory() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let executor = ProcessExecutor::default();
        executor
            .spawn_process(&argv(&["touch", "made-here"]), dir.path())
            .expect("touch");
        assert!(dir.path().join("made-here").exists());
    }

    #[test]
    fn test_empty_argv() {
        let executor = ProcessExecutor::default();
        assert!(executor.spawn_process(&[], Path::new("/")).is_ok());
    }
}
