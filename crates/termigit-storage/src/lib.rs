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

//! Storage abstraction layer for TermiGit
//!
//! Every byte TermiGit persists goes through the [`StorageBackend`] trait:
//! - the local object store under `.termi-git/` ([`LocalBackend`])
//! - the remote blob store, either an S3 bucket ([`S3Backend`]) or a plain
//!   directory addressed as `file://<dir>` ([`LocalBackend`] again)
//! - tests, which use the in-memory [`MockBackend`]
//!
//! Keys are `/`-separated strings such as `objects/<hash>` or `HEAD`.
//! Both sides of a push/pull use the same key layout, so objects are copied
//! between backends verbatim.
//!
//! # Examples
//!
//! ```no_run
//! use termigit_storage::{StorageBackend, mock::MockBackend};
//!
//! #[tokio::main]
//! async fn main() -> termigit_storage::StorageResult<()> {
//!     let storage = MockBackend::new();
//!
//!     storage.put("objects/ab12", b"payload").await?;
//!     assert!(storage.exists("objects/ab12").await?);
//!
//!     let keys = storage.list_objects("objects/").await?;
//!     assert_eq!(keys, vec!["objects/ab12".to_string()]);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod local;
pub mod mock;
pub mod s3;

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

pub use error::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use mock::MockBackend;
pub use s3::{S3Backend, S3Config};

/// URL scheme that selects a directory-backed remote instead of S3
pub const FILE_REMOTE_SCHEME: &str = "file://";

/// Async key/value object storage
///
/// Implementations must be thread-safe and debuggable so they can be shared
/// as `Arc<dyn StorageBackend>` between the object database and the sync
/// engine.
///
/// # Contract
///
/// - `get` fails with [`StorageError::NotFound`] when the key is absent
/// - `put` replaces the value stored under the key
/// - `delete` is idempotent
/// - `list_objects` returns keys sorted lexicographically
#[async_trait]
pub trait StorageBackend: Send + Sync + Debug {
    /// Retrieve the bytes stored under `key`
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Store `data` under `key`
    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Check whether `key` is present
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Remove `key`; absent keys are not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List every key starting with `prefix`, sorted
    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

/// Where a remote lives, parsed from the configured bucket name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocation {
    /// A directory on the local filesystem (`file://<dir>`)
    Directory(std::path::PathBuf),
    /// An S3 (or S3-compatible) bucket
    Bucket(String),
}

impl RemoteLocation {
    /// Classify a configured bucket string
    pub fn parse(bucket: &str) -> Self {
        match bucket.strip_prefix(FILE_REMOTE_SCHEME) {
            Some(dir) => RemoteLocation::Directory(std::path::PathBuf::from(dir)),
            None => RemoteLocation::Bucket(bucket.to_string()),
        }
    }
}

/// Open the remote blob store for a bucket and verify that it is reachable
///
/// `file://` buckets must name an existing directory. Anything else is treated
/// as an S3 bucket and checked with `HeadBucket`.
pub async fn open_remote(config: S3Config) -> StorageResult<Arc<dyn StorageBackend>> {
    match RemoteLocation::parse(&config.bucket) {
        RemoteLocation::Directory(dir) => {
            if !tokio::fs::try_exists(&dir).await? {
                return Err(StorageError::bucket_not_found(dir.display().to_string()));
            }
            debug!(path = %dir.display(), "Opening directory remote");
            Ok(Arc::new(LocalBackend::new(dir).await?))
        }
        RemoteLocation::Bucket(_) => {
            let backend = S3Backend::with_config(config).await?;
            backend.verify_bucket().await?;
            Ok(Arc::new(backend))
        }
    }
}
