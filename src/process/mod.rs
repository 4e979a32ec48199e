use std::io;

use thiserror::Error;

use crate::core::commands::ErrorKind;

pub mod executor;
pub mod signal;

pub use executor::ProcessExecutor;
pub use signal::InterruptFlag;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("{command}: exited with status {status}")]
    Exited { command: String, status: String },

    #[error("{command}: {source}")]
    Launch { command: String, source: io::Error },

    #[error("Signal error: {0}")]
    SignalError(String),
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::CommandNotFound(_) => ErrorKind::NotFound,
            ProcessError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            ProcessError::Exited { .. }
            | ProcessError::Launch { .. }
            | ProcessError::SignalError(_) => ErrorKind::GenericFailure,
        }
    }
}

impl From<ctrlc::Error> for ProcessError {
    fn from(err: ctrlc::Error) -> Self {
        ProcessError::SignalError(err.to_string())
    }
}
