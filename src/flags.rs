use std::path::PathBuf;

use clap::Parser;

use crate::input::history::DEFAULT_WINDOW;

/// minish - a small interactive shell with builtin file and text tools.
#[derive(Debug, Clone, Parser)]
#[command(name = "minish", version)]
pub struct Flags {
    /// Suppress the banner and exit-status notices
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Alias config file (default: ~/.minishell_config.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// History file (default: ~/.minishell_history)
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Number of entries `history` shows
    #[arg(long, value_name = "N", default_value_t = DEFAULT_WINDOW)]
    pub history_window: usize,

    /// Run a single command line and exit
    #[arg(short, long, value_name = "LINE")]
    pub execute: Option<String>,
}
