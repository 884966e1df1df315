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
use crate::output;
use crate::repo::open_repo;
use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use console::style;
use termigit_versioning::LogEntry;

/// Show commit history
///
/// Lists commits from HEAD back to the first commit, newest first.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Full history
    termi-git log

    # Last three commits, one line each
    termi-git log -n 3 --oneline")]
pub struct LogCmd {
    /// Limit the number of commits shown
    #[arg(short = 'n', long, value_name = "NUMBER")]
    pub max_count: Option<usize>,

    /// One line per commit
    #[arg(long)]
    pub oneline: bool,
}

impl LogCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;
        let mut history = repo.log().await?;
        let limit = self.max_count.unwrap_or(usize::MAX);

        let mut shown = 0;
        while shown < limit {
            let Some(entry) = history.next_entry().await else {
                break;
            };
            let entry = entry?;

            if shown == 0 && !self.oneline {
                output::line("Commit History:");
            }
            if self.oneline {
                self.print_oneline(&entry);
            } else {
                self.print_full(&entry);
            }
            shown += 1;
        }

        if shown == 0 {
            bail!("No commits found. Your repository might be empty.");
        }

        if let Some(missing) = history.truncated_at() {
            output::info(&format!(
                "Older history (from {}) has not been pulled into this repository.",
                missing.short()
            ));
        }
        Ok(())
    }

    fn print_full(&self, entry: &LogEntry) {
        let commit = &entry.commit;
        let date = commit.timestamp.with_timezone(&Local);

        output::line("----------------------------------------");
        output::line(&format!("{}", style(format!("commit {}", entry.hash)).yellow()));
        output::line(&format!("Author: {}", commit.author));
        output::line(&format!("Date:   {}", date.format("%a %b %e %H:%M:%S %Y %z")));
        output::line("");
        for line in commit.message.lines() {
            output::line(&format!("    {}", line));
        }
        output::line("");
    }

    fn print_oneline(&self, entry: &LogEntry) {
        output::line(&format!(
            "{} {}",
            style(entry.hash.short()).yellow(),
            entry.commit.summary()
        ));
    }
}
