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

//! CLI command helpers.

use assert_cmd::Command;
use std::path::Path;

/// Author name every test command commits as
pub const TEST_AUTHOR: &str = "termigit-tester";

/// Get a Command for the termi-git binary.
///
/// Variables that would change behavior between machines are removed and
/// the commit author is pinned to [`TEST_AUTHOR`].
///
/// # Example
/// ```ignore
/// use termigit_test_utils::termigit;
///
/// termigit()
///     .arg("log")
///     .current_dir(temp_dir.path())
///     .assert()
///     .failure();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn termigit() -> Command {
    let mut cmd = Command::cargo_bin("termi-git").expect("termi-git binary not found");
    cmd.env("TERMIGIT_AUTHOR_NAME", TEST_AUTHOR)
        .env_remove("TERMIGIT_REGION")
        .env_remove("TERMIGIT_S3_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

/// Fluent API wrapper for common termi-git command patterns.
pub struct TermigitCommand {
    cmd: Command,
}

impl TermigitCommand {
    /// Create a new TermigitCommand.
    pub fn new() -> Self {
        Self { cmd: termigit() }
    }

    /// Set the working directory for the command.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    /// Add an argument to the command.
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Add multiple arguments to the command.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Execute the command and assert success.
    pub fn run_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }

    /// Initialize a repository in `dir` backed by the remote `bucket`.
    pub fn init(dir: &Path, bucket: &str) {
        termigit()
            .args(["init", "--bucket", bucket])
            .current_dir(dir)
            .assert()
            .success();
    }

    /// Stage a file.
    pub fn add(dir: &Path, path: &str) {
        termigit()
            .args(["add", path])
            .current_dir(dir)
            .assert()
            .success();
    }

    /// Create a commit with the given message.
    pub fn commit(dir: &Path, message: &str) {
        termigit()
            .args(["commit", message])
            .current_dir(dir)
            .assert()
            .success();
    }

    /// Push to the configured remote.
    pub fn push(dir: &Path) {
        termigit().arg("push").current_dir(dir).assert().success();
    }

    /// Pull from the configured remote.
    pub fn pull(dir: &Path) {
        termigit().arg("pull").current_dir(dir).assert().success();
    }
}

impl Default for TermigitCommand {
    fn default() -> Self {
        Self::new()
    }
}
