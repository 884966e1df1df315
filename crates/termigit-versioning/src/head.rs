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

//! HEAD reference
//!
//! HEAD is a single key holding the hex id of the current commit. It is
//! absent until the first commit. The same key name and raw-text format are
//! used on the remote, so [`Head`] works against either store.

use crate::error::{VcsError, VcsResult};
use crate::oid::Oid;
use std::sync::Arc;
use termigit_storage::StorageBackend;
use tracing::debug;

/// Key under which HEAD is stored, locally and remotely
pub const HEAD_KEY: &str = "HEAD";

/// Handle to a HEAD pointer in some store
#[derive(Debug, Clone)]
pub struct Head {
    store: Arc<dyn StorageBackend>,
}

impl Head {
    /// HEAD stored in `store`
    pub fn new(store: Arc<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// Current commit id, `None` before the first commit
    pub async fn get(&self) -> VcsResult<Option<Oid>> {
        match self.store.get(HEAD_KEY).await {
            Ok(data) => Ok(Some(parse_head(&data)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Point HEAD at `oid`
    pub async fn set(&self, oid: &Oid) -> VcsResult<()> {
        self.store.put(HEAD_KEY, oid.to_hex().as_bytes()).await?;
        debug!(head = %oid, "Updated HEAD");
        Ok(())
    }
}

/// Parse the raw contents of a HEAD key
pub fn parse_head(data: &[u8]) -> VcsResult<Oid> {
    let text = std::str::from_utf8(data)
        .map_err(|_| VcsError::invalid_object("HEAD is not valid UTF-8"))?;
    Oid::from_hex(text).map_err(|e| VcsError::invalid_object(format!("HEAD: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use termigit_storage::MockBackend;

    #[tokio::test]
    async fn test_head_absent_initially() {
        let head = Head::new(Arc::new(MockBackend::new()));
        assert_eq!(head.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MockBackend::new();
        let head = Head::new(Arc::new(store.clone()));
        let oid = Oid::hash(b"commit");

        head.set(&oid).await.unwrap();
        assert_eq!(head.get().await.unwrap(), Some(oid));
        assert_eq!(store.get(HEAD_KEY).await.unwrap(), oid.to_hex().into_bytes());
    }

    #[tokio::test]
    async fn test_tolerates_trailing_newline() {
        let store = MockBackend::new();
        let oid = Oid::hash(b"commit");
        store.put(HEAD_KEY, format!("{}\n", oid).as_bytes()).await.unwrap();

        let head = Head::new(Arc::new(store));
        assert_eq!(head.get().await.unwrap(), Some(oid));
    }

    #[tokio::test]
    async fn test_garbage_head_is_error() {
        let store = MockBackend::new();
        store.put(HEAD_KEY, b"not a hash").await.unwrap();

        let head = Head::new(Arc::new(store));
        assert!(matches!(head.get().await, Err(VcsError::InvalidObject(_))));
    }
}
