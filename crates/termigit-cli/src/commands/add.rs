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
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use termigit_versioning::VcsError;

/// Add file contents to the staging area
///
/// Stores the file as a blob and records it in the index for the next
/// commit. Adding the same path again replaces its staged content.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Stage a single file
    termi-git add README.md

    # Stage several files
    termi-git add src/main.c docs/notes.txt

SEE ALSO:
    termi-git-commit(1)")]
pub struct AddCmd {
    /// Files to add
    #[arg(value_name = "FILE", required = true)]
    pub paths: Vec<PathBuf>,
}

impl AddCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;
        let cwd = std::env::current_dir()?;

        for path in &self.paths {
            match repo.add(&cwd.join(path)).await {
                Ok((staged, oid)) => {
                    tracing::debug!(path = %staged, oid = %oid, "Staged");
                    output::success(&format!("Added '{}' to the staging area.", path.display()));
                }
                Err(VcsError::FileNotFound(_)) => {
                    return Err(VcsError::FileNotFound(path.clone()).into());
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to add '{}'", path.display()));
                }
            }
        }
        Ok(())
    }
}
