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

//! # TermiGit Test Utilities
//!
//! Shared helpers for CLI integration tests:
//! - `termi-git` command builders with a scrubbed environment
//! - Temporary repositories and `file://` remotes

pub mod cli;
pub mod repo;

// Re-export commonly used items at crate root
pub use cli::{termigit, TermigitCommand, TEST_AUTHOR};
pub use predicates;
pub use repo::{TestRemote, TestRepo};
