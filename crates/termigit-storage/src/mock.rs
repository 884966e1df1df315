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

//! In-memory mock storage backend for testing
//!
//! A thread-safe [`StorageBackend`](crate::StorageBackend) over
//! `Arc<RwLock<HashMap>>`. Clones share the same map, so a test can keep a
//! handle and inspect what the code under test wrote.
//!
//! The mock also counts writes and can be told to reject writes under a key
//! prefix, which lets sync tests observe upload counts and simulate a remote
//! that fails halfway through a push.
//!
//! ```rust,no_run
//! use termigit_storage::{StorageBackend, mock::MockBackend};
//!
//! #[tokio::main]
//! async fn main() -> termigit_storage::StorageResult<()> {
//!     let storage = MockBackend::new();
//!     storage.put("HEAD", b"abc").await?;
//!     assert_eq!(storage.get("HEAD").await?, b"abc");
//!     assert_eq!(storage.put_count(), 1);
//!     Ok(())
//! }
//! ```

use crate::{StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory [`StorageBackend`]
#[derive(Clone, Default)]
pub struct MockBackend {
    store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    puts: Arc<AtomicUsize>,
    denied_prefix: Arc<RwLock<Option<String>>>,
}

impl MockBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with `initial_data`
    pub fn with_data(initial_data: HashMap<String, Vec<u8>>) -> Self {
        MockBackend {
            store: Arc::new(RwLock::new(initial_data)),
            ..Self::default()
        }
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// All stored keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of successful `put` calls so far
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Make every later `put` under `prefix` fail with a backend error
    pub async fn deny_writes_to(&self, prefix: impl Into<String>) {
        *self.denied_prefix.write().await = Some(prefix.into());
    }

    fn check_key(key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::invalid_key("key cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBackend")
            .field("puts", &self.put_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        Self::check_key(key)?;
        self.store
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        Self::check_key(key)?;

        if let Some(prefix) = self.denied_prefix.read().await.as_deref() {
            if key.starts_with(prefix) {
                return Err(StorageError::backend(format!("write rejected: {}", key)));
            }
        }

        self.store.write().await.insert(key.to_string(), data.to_vec());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Self::check_key(key)?;
        Ok(self.store.read().await.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        Self::check_key(key)?;
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .store
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
