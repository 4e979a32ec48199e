pub mod commands;
pub mod config;
pub mod interpreter;
pub mod state;

pub use interpreter::Interpreter;
pub use state::ShellState;
