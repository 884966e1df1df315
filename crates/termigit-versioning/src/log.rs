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

//! Commit history traversal
//!
//! [`History`] follows `parent` links from a starting commit, loading one
//! commit per step. A pulled repository only holds the commits it fetched,
//! so a parent missing from the local store ends the walk instead of failing
//! it; [`History::truncated_at`] reports where that happened.

use crate::commit::Commit;
use crate::error::{VcsError, VcsResult};
use crate::odb::ObjectDatabase;
use crate::oid::Oid;
use tracing::debug;

/// One commit in the history, with its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Commit id
    pub hash: Oid,
    /// The commit itself
    pub commit: Commit,
}

/// Lazy walker over the parent chain, most recent first
#[derive(Debug)]
pub struct History<'a> {
    odb: &'a ObjectDatabase,
    next: Option<Oid>,
    first: bool,
    truncated_at: Option<Oid>,
}

impl<'a> History<'a> {
    /// Walk from `start`; `None` yields nothing
    pub fn new(odb: &'a ObjectDatabase, start: Option<Oid>) -> Self {
        Self {
            odb,
            next: start,
            first: true,
            truncated_at: None,
        }
    }

    /// Load the next commit
    ///
    /// Returns `None` once the root commit has been yielded, after an error,
    /// or when the next parent is not in the local store.
    pub async fn next_entry(&mut self) -> Option<VcsResult<LogEntry>> {
        let hash = self.next.take()?;
        let first = std::mem::replace(&mut self.first, false);

        match Commit::read(self.odb, &hash).await {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok(LogEntry { hash, commit }))
            }
            Err(VcsError::ObjectNotFound(_)) if !first => {
                debug!(commit = %hash, "History ends at a commit that was never fetched");
                self.truncated_at = Some(hash);
                None
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Parent commit the walk stopped at because it is not stored locally
    pub fn truncated_at(&self) -> Option<Oid> {
        self.truncated_at
    }

    /// Drain the walker into a vector
    pub async fn collect(mut self) -> VcsResult<Vec<LogEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await {
            entries.push(entry?);
        }
        Ok(entries)
    }
}
