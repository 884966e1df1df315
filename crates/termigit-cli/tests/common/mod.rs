// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 TermiGit Contributors

//! Common test helpers for TermiGit CLI tests.
//!
//! Re-exports termigit-test-utils and adds a few CLI-specific helpers.

#![allow(dead_code, unused_imports)]

pub use termigit_test_utils::{termigit, TermigitCommand, TestRemote, TestRepo, TEST_AUTHOR};

/// A remote plus a repository initialized against it.
pub fn repo_with_remote() -> (TestRemote, TestRepo) {
    let remote = TestRemote::new();
    let repo = TestRepo::initialized(&remote);
    (remote, repo)
}

/// First seven characters of a commit id.
pub fn short(hash: &str) -> &str {
    &hash[..7]
}
