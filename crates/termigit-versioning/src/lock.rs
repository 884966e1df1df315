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

//! Exclusive repository lock
//!
//! Mutating commands hold a lock file inside the repository directory for
//! their whole duration. The file is created with `create_new`, so exactly
//! one process can hold it, and removed when the guard is dropped.

use crate::error::{VcsError, VcsResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the lock file inside `.termi-git/`
pub const LOCK_FILE: &str = "termi-git.lock";

/// Guard for the repository lock; released on drop
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
}

impl RepoLock {
    /// Acquire the lock in `repo_dir`
    ///
    /// # Errors
    ///
    /// [`VcsError::RepositoryLocked`] if another holder exists, carrying the
    /// pid it recorded.
    pub fn acquire(repo_dir: &Path) -> VcsResult<Self> {
        let path = repo_dir.join(LOCK_FILE);

        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let holder = std::fs::read_to_string(&path)
                    .ok()
                    .map(|pid| pid.trim().to_string())
                    .filter(|pid| !pid.is_empty())
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(VcsError::RepositoryLocked { path, holder });
            }
            Err(e) => return Err(e.into()),
        };

        // Holder pid, for whoever has to clean up a stale lock
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "Acquired repository lock");

        Ok(Self { path })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Released repository lock"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove lock file"),
        }
    }
}
