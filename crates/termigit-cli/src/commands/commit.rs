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
use crate::repo::{author_name, open_repo};
use anyhow::Result;
use clap::Parser;

/// Record the staged files as a new commit
///
/// The new commit contains exactly the staged files, points at the current
/// HEAD as its parent and becomes the new HEAD. The staging area is emptied
/// afterwards.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    termi-git commit \"Add project notes\"

ENVIRONMENT:
    TERMIGIT_AUTHOR_NAME   author recorded in the commit (defaults to $USER)")]
pub struct CommitCmd {
    /// Commit message
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

impl CommitCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;

        match repo.commit(&self.message, &author_name()).await {
            Ok((oid, _commit)) => {
                output::success("Committed successfully!");
                output::line(&format!("[{}] {}", oid.short(), self.message));
                Ok(())
            }
            Err(e) if e.is_empty_index() => {
                output::info("Nothing to commit, staging area is empty.");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
