//! Command-line definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::schedule::DEFAULT_HORIZON_DAYS;

/// In-memory task tracker with due-date reminders and recurring tasks
#[derive(Parser)]
#[command(name = "tmill", version, about, long_about = None)]
pub struct Cli {
    /// Reject malformed input instead of coercing it to defaults
    #[arg(long, env = "TASKMILL_STRICT")]
    pub strict: bool,

    /// Days ahead that count as "upcoming" in reminder reports
    #[arg(
        long,
        env = "TASKMILL_HORIZON",
        default_value_t = DEFAULT_HORIZON_DAYS,
        value_name = "DAYS"
    )]
    pub horizon: i64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
