pub mod history;

pub use history::{DetachedEditor, HistoryError, HistoryLog, LineHistory, DEFAULT_WINDOW};
