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

//! Staging area index management.
//!
//! The index maps repository-relative paths to the blob ids staged for the
//! next commit. It is persisted as pretty-printed JSON under `index.json` in
//! the repository directory and rewritten on every `stage`, so a crash after
//! `add` never loses the staged entry. The file is absent whenever nothing
//! is staged.

use crate::error::{VcsError, VcsResult};
use crate::oid::Oid;
use std::collections::BTreeMap;
use std::sync::Arc;
use termigit_storage::StorageBackend;
use tracing::debug;

/// Key of the index file inside the repository directory
pub const INDEX_KEY: &str = "index.json";

/// Persistent staging area
#[derive(Debug, Clone)]
pub struct Index {
    store: Arc<dyn StorageBackend>,
}

impl Index {
    /// Index persisted in `store`
    pub fn new(store: Arc<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// Current entries, empty when the index file does not exist
    pub async fn entries(&self) -> VcsResult<BTreeMap<String, Oid>> {
        match self.store.get(INDEX_KEY).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.is_not_found() => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or overwrite the entry for `path` and persist immediately
    pub async fn stage(&self, path: &str, oid: Oid) -> VcsResult<()> {
        let mut entries = self.entries().await?;
        entries.insert(path.to_string(), oid);

        let contents = serde_json::to_vec_pretty(&entries)?;
        self.store.put(INDEX_KEY, &contents).await?;

        debug!(path = %path, oid = %oid, staged = entries.len(), "Staged file");
        Ok(())
    }

    /// All staged entries
    ///
    /// # Errors
    ///
    /// [`VcsError::EmptyIndex`] when nothing is staged.
    pub async fn read_all(&self) -> VcsResult<BTreeMap<String, Oid>> {
        let entries = self.entries().await?;
        if entries.is_empty() {
            return Err(VcsError::EmptyIndex);
        }
        Ok(entries)
    }

    /// Delete the persisted index
    pub async fn clear(&self) -> VcsResult<()> {
        self.store.delete(INDEX_KEY).await?;
        debug!("Cleared index");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termigit_storage::{LocalBackend, MockBackend};

    fn index() -> (MockBackend, Index) {
        let store = MockBackend::new();
        (store.clone(), Index::new(Arc::new(store)))
    }

    #[tokio::test]
    async fn test_read_all_empty() {
        let (_store, index) = index();
        assert!(index.read_all().await.unwrap_err().is_empty_index());
        assert!(index.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stage_persists_immediately() {
        let (store, index) = index();
        let oid = Oid::hash(b"content");

        index.stage("a.txt", oid).await.unwrap();
        assert!(store.exists(INDEX_KEY).await.unwrap());

        let reopened = Index::new(Arc::new(store));
        assert_eq!(reopened.read_all().await.unwrap().get("a.txt"), Some(&oid));
    }

    #[tokio::test]
    async fn test_stage_overwrites_path() {
        let (_store, index) = index();

        index.stage("a.txt", Oid::hash(b"v1")).await.unwrap();
        index.stage("a.txt", Oid::hash(b"v2")).await.unwrap();

        let entries = index.read_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["a.txt"], Oid::hash(b"v2"));
    }

    #[tokio::test]
    async fn test_same_content_two_paths() {
        let (_store, index) = index();
        let oid = Oid::hash(b"same");

        index.stage("one.txt", oid).await.unwrap();
        index.stage("two.txt", oid).await.unwrap();
        assert_eq!(index.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let (store, index) = index();

        index.stage("a.txt", Oid::hash(b"x")).await.unwrap();
        index.clear().await.unwrap();
        index.clear().await.unwrap();

        assert!(!store.exists(INDEX_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_on_disk_format() {
        let temp = tempfile::TempDir::new().unwrap();
        let index = Index::new(Arc::new(LocalBackend::new(temp.path()).await.unwrap()));
        let oid = Oid::hash(b"x");

        index.stage("dir/b.txt", oid).await.unwrap();
        index.stage("a.txt", oid).await.unwrap();

        let raw = std::fs::read_to_string(temp.path().join(INDEX_KEY)).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a.txt", "dir/b.txt"]);
        assert!(raw.contains('\n'));
    }
}
