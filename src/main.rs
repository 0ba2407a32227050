//! Taskmill - interactive task tracker with reminders and recurrence

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use taskmill::cli::{Cli, Commands, ParseMode, Repl};

fn main() -> Result<()> {
    if std::env::var("TASKMILL_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("taskmill=debug")
            .init();
    }

    let cli = Cli::parse();

    // Completion never touches task state
    if let Some(Commands::Completion { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "tmill", &mut std::io::stdout());
        return Ok(());
    }

    let mode = if cli.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    Repl::new(mode, cli.horizon).run()
}
