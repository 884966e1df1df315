// TermiGit - Minimal distributed version control
// Copyright (C) 2025 TermiGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

mod commands;
mod output;
mod progress;
mod repo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::*;
use termigit_observability::{init_tracing, LogFormat};

/// A minimal distributed version control system
#[derive(Parser)]
#[command(name = "termi-git")]
#[command(version, about = "Minimal distributed version control backed by S3")]
#[command(
    long_about = "TermiGit tracks snapshots of files in a content-addressed object store
and syncs them with an S3 bucket (or a file:// directory) shared by collaborators."
)]
#[command(propagate_version = true)]
#[command(author = "TermiGit Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Colored output: auto, always or never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Run as if started in PATH
    #[arg(short = 'C', global = true, value_name = "PATH")]
    directory: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a repository bound to a remote bucket
    Init(InitCmd),

    /// Stage files for the next commit
    Add(AddCmd),

    /// Record staged files as a new commit
    Commit(CommitCmd),

    /// Upload local history to the remote
    Push(PushCmd),

    /// Download the remote HEAD and check it out
    Pull(PullCmd),

    /// Restore the working directory to an earlier commit
    Revert(RevertCmd),

    /// Show commit history
    Log(LogCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Some("debug")
    } else if cli.quiet {
        Some("error")
    } else {
        None
    };
    // A second initialization only happens in tests
    init_tracing(LogFormat::Compact, level).ok();
    output::set_quiet(cli.quiet);

    match cli.color.as_str() {
        "never" => console::set_colors_enabled(false),
        "always" => console::set_colors_enabled(true),
        "auto" => {}
        _ => {
            output::error(&format!("Invalid color option: {}", cli.color));
            std::process::exit(1);
        }
    }

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            output::error(&format!("Error: cannot change to '{}': {}", dir.display(), e));
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Init(cmd) => cmd.execute().await,
        Commands::Add(cmd) => cmd.execute().await,
        Commands::Commit(cmd) => cmd.execute().await,
        Commands::Push(cmd) => cmd.execute().await,
        Commands::Pull(cmd) => cmd.execute().await,
        Commands::Revert(cmd) => cmd.execute().await,
        Commands::Log(cmd) => cmd.execute().await,
    };

    if let Err(e) = result {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
