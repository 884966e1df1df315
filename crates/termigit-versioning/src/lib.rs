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

//! Version control engine for TermiGit
//!
//! This crate implements everything behind the `termi-git` commands:
//! - Content-addressable object database with SHA-256 addressing
//! - Staging index, flat trees and a single-parent commit chain
//! - Working directory checkout for revert and pull
//! - Push/pull of object closures to any `StorageBackend` remote
//!
//! # Architecture
//!
//! - **Objects**: blobs, trees and commits are stored as a header
//!   `"<type> <len>\0"` followed by the payload. The id is the SHA-256 of
//!   those bytes, so identical content is stored once.
//! - **Repository state**: `.termi-git/` holds `objects/`, `index.json`,
//!   `HEAD` and `config.json`, all behind a `LocalBackend`.
//! - **Remotes**: the same key layout on S3 (or a `file://` directory).
//!
//! # Examples
//!
//! ```no_run
//! use termigit_config::RepoConfig;
//! use termigit_versioning::Repository;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> termigit_versioning::VcsResult<()> {
//!     let repo = Repository::init(Path::new("."), &RepoConfig::new("my-bucket")).await?;
//!
//!     repo.add(Path::new("notes.txt")).await?;
//!     let (oid, _) = repo.commit("Add notes", "alice").await?;
//!     println!("[{}] Add notes", oid.short());
//!
//!     let remote = repo.open_remote().await?;
//!     repo.push(remote, |_| {}).await?;
//!     Ok(())
//! }
//! ```

mod checkout;
mod commit;
mod error;
mod head;
mod index;
mod lock;
mod log;
pub mod object;
mod odb;
mod oid;
mod repository;
mod sync;
mod tree;

pub use checkout::{CheckoutManager, CheckoutReport};
pub use commit::{build_commit, Commit};
pub use error::{VcsError, VcsResult};
pub use head::{parse_head, Head, HEAD_KEY};
pub use index::{Index, INDEX_KEY};
pub use lock::{RepoLock, LOCK_FILE};
pub use log::{History, LogEntry};
pub use object::ObjectType;
pub use odb::{object_key, ObjectDatabase, OdbMetrics, OBJECTS_PREFIX};
pub use oid::{Oid, ParseOidError, OID_HEX_LEN, SHORT_OID_LEN};
pub use repository::{connect_remote, remote_config, PullReport, Repository, CONFIG_FILE, REPO_DIR};
pub use sync::{PushReport, SyncEngine, SyncEvent};
pub use tree::{build_tree, Tree};
