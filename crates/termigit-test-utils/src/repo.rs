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

//! Temporary repositories and remotes for integration tests.

use crate::cli::{termigit, TermigitCommand};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A directory acting as a `file://` remote, removed on drop.
pub struct TestRemote {
    temp_dir: TempDir,
}

impl TestRemote {
    /// Create an empty remote.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create remote directory"),
        }
    }

    /// Bucket string to pass to `termi-git init --bucket`.
    pub fn bucket(&self) -> String {
        format!("file://{}", self.temp_dir.path().display())
    }

    /// Path of the remote directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Contents of the remote HEAD, if anything was pushed.
    pub fn head(&self) -> Option<String> {
        fs::read_to_string(self.temp_dir.path().join("HEAD")).ok()
    }

    /// Number of objects stored on the remote.
    pub fn object_count(&self) -> usize {
        fs::read_dir(self.temp_dir.path().join("objects"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestRemote {
    fn default() -> Self {
        Self::new()
    }
}

/// A test repository with automatic cleanup.
///
/// # Example
/// ```ignore
/// use termigit_test_utils::{TestRemote, TestRepo};
///
/// let remote = TestRemote::new();
/// let repo = TestRepo::initialized(&remote);
/// repo.add_and_commit("file.txt", b"content", "Add file");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test directory (not initialized as a repo).
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a test directory and initialize it against `remote`.
    pub fn initialized(remote: &TestRemote) -> Self {
        let repo = Self::new();
        TermigitCommand::init(repo.path(), &remote.bucket());
        repo
    }

    /// Get the path to the working tree.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the .termi-git directory.
    pub fn repo_dir(&self) -> PathBuf {
        self.temp_dir.path().join(".termi-git")
    }

    /// termi-git command running inside this repository.
    pub fn cmd(&self) -> Command {
        let mut cmd = termigit();
        cmd.current_dir(self.path());
        cmd
    }

    /// Write a file to the repository.
    pub fn write_file(&self, name: &str, content: &[u8]) {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Read a file from the repository.
    pub fn read_file(&self, name: &str) -> Vec<u8> {
        fs::read(self.temp_dir.path().join(name)).expect("Failed to read file")
    }

    /// Check if a file exists in the repository.
    pub fn file_exists(&self, name: &str) -> bool {
        self.temp_dir.path().join(name).exists()
    }

    /// Delete a file from the repository.
    pub fn delete_file(&self, name: &str) {
        let path = self.temp_dir.path().join(name);
        if path.exists() {
            fs::remove_file(&path).expect("Failed to delete file");
        }
    }

    /// Stage a file.
    pub fn add(&self, name: &str) {
        TermigitCommand::add(self.path(), name);
    }

    /// Create a commit with the given message.
    pub fn commit(&self, message: &str) {
        TermigitCommand::commit(self.path(), message);
    }

    /// Write, stage and commit a single file.
    pub fn add_and_commit(&self, name: &str, content: &[u8], message: &str) {
        self.write_file(name, content);
        self.add(name);
        self.commit(message);
    }

    /// Local HEAD as hex, `None` before the first commit.
    pub fn head(&self) -> Option<String> {
        fs::read_to_string(self.repo_dir().join("HEAD"))
            .ok()
            .map(|s| s.trim().to_string())
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_file() {
        let repo = TestRepo::new();
        repo.write_file("nested/test.txt", b"Hello");
        assert_eq!(repo.read_file("nested/test.txt"), b"Hello");
        assert!(repo.file_exists("nested/test.txt"));

        repo.delete_file("nested/test.txt");
        assert!(!repo.file_exists("nested/test.txt"));
    }

    #[test]
    fn test_remote_bucket_string() {
        let remote = TestRemote::new();
        assert!(remote.bucket().starts_with("file://"));
        assert_eq!(remote.head(), None);
        assert_eq!(remote.object_count(), 0);
    }
}
