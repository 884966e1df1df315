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

/// Upload local history to the remote
///
/// Sends HEAD, every ancestor commit and the files they reference to the
/// configured bucket, skipping objects the remote already has. The remote
/// HEAD is updated last.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    termi-git push

SEE ALSO:
    termi-git-pull(1)")]
pub struct PushCmd {}

impl PushCmd {
    pub async fn execute(&self) -> Result<()> {
        let repo = open_repo().await?;
        let remote = repo
            .open_remote()
            .await
            .context("Failed to connect to remote")?;

        output::progress("Enumerating objects to push...");
        let pb = progress::spinner("Uploading objects...");

        let result = repo
            .push(remote, |event| match event {
                SyncEvent::ObjectsFound(count) => {
                    pb.suspend(|| output::info(&format!("Found {} objects.", count)));
                }
                SyncEvent::Uploaded(oid) => pb.set_message(format!("Uploaded {}", oid.short())),
                _ => {}
            })
            .await;
        pb.finish_and_clear();
        let report = result?;

        if report.up_to_date {
            output::info(&format!("Remote HEAD already at {}.", report.head.short()));
        } else {
            output::detail("Uploaded", &report.uploaded.to_string());
            output::detail("Already on remote", &(report.objects - report.uploaded).to_string());
            output::detail("HEAD", &report.head.short());
        }
        output::success("Push complete. Your remote is up-to-date.");
        Ok(())
    }
}
