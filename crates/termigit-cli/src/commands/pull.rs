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
use crate::progress;
use crate::repo::open_repo;
use anyhow::{Context, Result};
use clap::Parser;
use termigit_versioning::SyncEvent;

/// Download the remote HEAD and check it out
///
/// Fetches the latest pushed commit with its files, replaces the tracked
/// files in the working directory with that snapshot and moves HEAD to it.
/// Local changes to tracked files are overwritten.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    termi-git pull

SEE ALSO:
    termi-git-push(1)")]
pub struct PullCmd {}

impl PullCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;
        let remote = repo
            .open_remote()
            .await
            .context("Failed to connect to remote")?;

        output::progress("Fetching remote HEAD...");
        let pb = progress::spinner("Fetching objects...");

        let result = repo
            .pull(remote, |event| match event {
                SyncEvent::RemoteHead(oid) => {
                    pb.suspend(|| output::info(&format!("Remote HEAD is at commit: {}", oid.short())));
                }
                SyncEvent::Fetching(oid) => {
                    pb.suspend(|| output::line(&format!("   Fetching object: {}", oid)));
                }
                _ => {}
            })
            .await;
        pb.finish_and_clear();
        let report = result?;

        for path in &report.checkout.removed {
            output::line(&format!("   Removing {}", path));
        }
        output::detail("Fetched", &report.fetched.len().to_string());
        output::detail("Files written", &report.checkout.written.len().to_string());
        output::success("Pull complete. Your local repository is up-to-date.");
        Ok(())
    }
}
