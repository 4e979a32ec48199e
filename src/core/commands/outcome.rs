use std::io;
use std::path::Path;

use thiserror::Error;

/// Failure classes every builtin and the external runner report through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    InvalidArgument,
    IsADirectory,
    GenericFailure,
}

/// Result of executing one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Empty or all-whitespace input.
    Noop,
    Success,
    Failure(ErrorKind),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failure(_))
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}: No such file or directory")]
    NotFound(String),

    #[error("{0}: not found")]
    UnknownName(String),

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("-r not specified; omitting directory '{0}'")]
    OmittedDirectory(String),

    #[error("{target}: {reason}")]
    Failed { target: String, reason: String },

    #[error("write error: {0}")]
    Output(#[from] io::Error),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::NotFound(_) | CommandError::UnknownName(_) => ErrorKind::NotFound,
            CommandError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            CommandError::IsADirectory(_) | CommandError::OmittedDirectory(_) => {
                ErrorKind::IsADirectory
            }
            CommandError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CommandError::NotADirectory(_)
            | CommandError::Failed { .. }
            | CommandError::Output(_) => ErrorKind::GenericFailure,
        }
    }

    pub fn usage(text: &str) -> Self {
        CommandError::InvalidArgument(format!("usage: {}", text))
    }

    /// Classifies an OS error raised while operating on `target`.
    pub fn io(target: impl AsRef<Path>, err: io::Error) -> Self {
        let target = target.as_ref().display().to_string();
        match err.raw_os_error() {
            Some(libc::ENOENT) => return CommandError::NotFound(target),
            Some(libc::EACCES) | Some(libc::EPERM) => {
                return CommandError::PermissionDenied(target)
            }
            Some(libc::EISDIR) => return CommandError::IsADirectory(target),
            Some(libc::ENOTDIR) => return CommandError::NotADirectory(target),
            Some(libc::ENOTEMPTY) => {
                return CommandError::Failed {
                    target,
                    reason: "Directory not empty".to_string(),
                }
            }
            Some(libc::EEXIST) => {
                return CommandError::Failed {
                    target,
                    reason: "File exists".to_string(),
                }
            }
            _ => {}
        }

        match err.kind() {
            io::ErrorKind::NotFound => CommandError::NotFound(target),
            io::ErrorKind::PermissionDenied => CommandError::PermissionDenied(target),
            io::ErrorKind::InvalidData => CommandError::Failed {
                target,
                reason: "invalid UTF-8 data".to_string(),
            },
            _ => CommandError::Failed {
                target,
                reason: err.to_string(),
            },
        }
    }
}
