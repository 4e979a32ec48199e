use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::process::ProcessError;

/// Raised by the SIGINT handler; polled by long-running builtins.
#[derive(Clone, Debug, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the process SIGINT handler. The shell keeps running on
    /// Ctrl-C; a foreground child receives the signal on its own.
    pub fn install(&self) -> Result<(), ProcessError> {
        let flag = Arc::clone(&self.0);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })?;
        Ok(())
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_shared_between_clones() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        assert!(!other.is_raised());
        flag.raise();
        assert!(other.is_raised());
        other.reset();
        assert!(!flag.is_raised());
    }
}
