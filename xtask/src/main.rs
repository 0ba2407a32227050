//! xtask - Development tasks for taskmill

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for taskmill")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CLI documentation from clap definitions
    GenDocs,
    /// Generate shell completion scripts into completions/
    GenCompletions,
}

fn main() {
    let args = Xtask::parse();
    match args.command {
        Commands::GenDocs => generate_cli_docs(),
        Commands::GenCompletions => generate_completions(),
    }
}

fn generate_cli_docs() {
    let markdown = clap_markdown::help_markdown::<taskmill::cli::Cli>();

    let docs_dir = Path::new("docs/cli");
    fs::create_dir_all(docs_dir).expect("Failed to create docs/cli directory");

    let output_path = docs_dir.join("reference.md");
    fs::write(&output_path, markdown).expect("Failed to write CLI reference");

    println!("Generated CLI documentation at {}", output_path.display());
}

fn generate_completions() {
    let out_dir = Path::new("completions");
    fs::create_dir_all(out_dir).expect("Failed to create completions directory");

    let mut command = taskmill::cli::Cli::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let path = clap_complete::generate_to(shell, &mut command, "tmill", out_dir)
            .expect("Failed to write completion script");
        println!("Generated {}", path.display());
    }
}
