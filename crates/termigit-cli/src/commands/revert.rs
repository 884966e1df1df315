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
use anyhow::Result;
use clap::Parser;
use termigit_versioning::VcsError;

/// Restore the working directory to an earlier commit
///
/// Tracked files that do not exist in the target commit are deleted, every
/// file of the target commit is rewritten, and HEAD moves to the target.
/// Untracked files are left alone.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Any unique prefix of the commit id works
    termi-git revert 3fa4c1b

SEE ALSO:
    termi-git-log(1)")]
pub struct RevertCmd {
    /// Commit id or unique prefix
    #[arg(value_name = "COMMIT")]
    pub commit: String,
}

impl RevertCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;

        let (oid, report) = match repo.revert(&self.commit).await {
            Ok(result) => result,
            Err(VcsError::AmbiguousHash { prefix, candidates }) => {
                output::warning(&format!("'{}' matches several commits:", prefix));
                for candidate in &candidates {
                    output::line(&format!("   {}", candidate));
                }
                return Err(VcsError::AmbiguousHash { prefix, candidates }.into());
            }
            Err(e) => return Err(e.into()),
        };

        for path in &report.removed {
            output::line(&format!("   Removing {}", path));
        }
        output::success(&format!(
            "Successfully reverted. HEAD is now at {}.",
            oid.short()
        ));
        Ok(())
    }
}
