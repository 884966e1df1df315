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

//! Checkout operations for reconciling the working directory with a tree
//!
//! Given the tree currently checked out and a target tree:
//! 1. every path in the current tree that the target lacks is deleted
//!    (already-missing files are fine)
//! 2. every path in the target is written from its blob, creating parent
//!    directories and overwriting whatever is on disk
//!
//! Local edits to tracked files are overwritten. Before anything is touched
//! every target path is validated and every target blob is confirmed to be
//! in the object store, so a missing object is reported up front instead of
//! halfway through the write pass. Moving HEAD is the caller's job and must
//! only happen once [`CheckoutManager::apply`] has returned `Ok`.

use crate::error::{VcsError, VcsResult};
use crate::odb::ObjectDatabase;
use crate::repository::REPO_DIR;
use crate::tree::Tree;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// What a checkout changed on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReport {
    /// Paths deleted because the target no longer tracks them
    pub removed: Vec<String>,
    /// Paths written from the target tree
    pub written: Vec<String>,
}

/// Checkout manager for working directory operations
pub struct CheckoutManager<'a> {
    odb: &'a ObjectDatabase,
    work_dir: PathBuf,
}

impl<'a> CheckoutManager<'a> {
    /// Checkout manager writing below `work_dir`
    pub fn new(odb: &'a ObjectDatabase, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            odb,
            work_dir: work_dir.into(),
        }
    }

    /// Reconcile the working directory from `current` to `target`
    pub async fn apply(&self, current: &Tree, target: &Tree) -> VcsResult<CheckoutReport> {
        self.preflight(target).await?;

        let mut report = CheckoutReport::default();

        for path in current.paths_missing_from(target) {
            let full = self.resolve(path)?;
            match fs::remove_file(&full).await {
                Ok(()) => debug!(path = %path, "Removed file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path, "File already absent")
                }
                Err(e) => return Err(e.into()),
            }
            self.prune_empty_parents(&full).await;
            report.removed.push(path.clone());
        }

        for (path, oid) in target.iter() {
            let full = self.resolve(path)?;
            let content = self.odb.read_blob(oid).await?;

            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&full, &content).await?;

            debug!(path = %path, oid = %oid, size = content.len(), "Wrote file");
            report.written.push(path.clone());
        }

        info!(
            removed = report.removed.len(),
            written = report.written.len(),
            "Checkout complete"
        );
        Ok(report)
    }

    async fn preflight(&self, target: &Tree) -> VcsResult<()> {
        for (path, oid) in target.iter() {
            self.resolve(path)?;
            if !self.odb.exists(oid).await? {
                return Err(VcsError::ObjectNotFound(*oid));
            }
        }
        Ok(())
    }

    /// Map a tree path onto the working directory
    ///
    /// The raw key is checked segment by segment: it must be `/`-separated
    /// with no empty, `.` or `..` segments, no backslashes and nothing
    /// inside the repository directory. Tree contents may come from a
    /// remote, and each accepted key names exactly one file.
    fn resolve(&self, path: &str) -> VcsResult<PathBuf> {
        if path.is_empty() {
            return Err(VcsError::invalid_path(path, "empty path"));
        }
        if path.contains('\\') {
            return Err(VcsError::invalid_path(path, "path must use '/' separators"));
        }

        let segments: Vec<&str> = path.split('/').collect();
        if segments
            .iter()
            .any(|segment| matches!(*segment, "" | "." | ".."))
        {
            return Err(VcsError::invalid_path(path, "path must stay inside the working tree"));
        }
        if segments[0] == REPO_DIR {
            return Err(VcsError::invalid_path(path, "path points into the repository directory"));
        }

        let mut full = self.work_dir.clone();
        for segment in &segments {
            let component = Path::new(segment);
            if !matches!(component.components().next(), Some(Component::Normal(_)))
                || component.components().count() != 1
            {
                return Err(VcsError::invalid_path(path, "unsupported path component"));
            }
            full.push(segment);
        }
        Ok(full)
    }

    /// Remove directories left empty by a deletion, stopping at the root
    async fn prune_empty_parents(&self, removed: &Path) {
        let mut dir = removed.parent();
        while let Some(current) = dir {
            if current == self.work_dir || !current.starts_with(&self.work_dir) {
                break;
            }
            // remove_dir fails on non-empty directories, which ends the walk
            if fs::remove_dir(current).await.is_err() {
                break;
            }
            dir = current.parent();
        }
    }
}
