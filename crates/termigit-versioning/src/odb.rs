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

//! Object Database (ODB) - content-addressable storage with SHA-256 addressing
//!
//! - **Content addressing**: objects live under `objects/<hex>` where `<hex>`
//!   is the SHA-256 of the encoded object
//! - **Write-once**: writing an object that already exists is a no-op
//! - **Integrity**: every read re-hashes the stored bytes
//! - **Typed reads**: callers state which object type they expect
//!
//! The same key layout is used on remotes, so [`ObjectDatabase::read_raw`]
//! and [`ObjectDatabase::write_raw`] move encoded objects between stores
//! without re-encoding them.

use crate::error::{VcsError, VcsResult};
use crate::object::{self, ObjectType};
use crate::oid::Oid;
use std::collections::BTreeSet;
use std::sync::Arc;
use termigit_storage::StorageBackend;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Key prefix under which objects are stored
pub const OBJECTS_PREFIX: &str = "objects/";

/// Storage key for an object id
pub fn object_key(oid: &Oid) -> String {
    format!("{}{}", OBJECTS_PREFIX, oid.to_hex())
}

/// Write counters, mostly useful to tests and debug logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OdbMetrics {
    /// Objects newly stored
    pub objects_written: u64,
    /// Writes skipped because the object already existed
    pub duplicates_skipped: u64,
    /// Payload bytes newly stored
    pub bytes_written: u64,
}

impl OdbMetrics {
    fn record_write(&mut self, bytes: usize, is_new: bool) {
        if is_new {
            self.objects_written += 1;
            self.bytes_written += bytes as u64;
        } else {
            self.duplicates_skipped += 1;
        }
    }
}

/// Object Database over any [`StorageBackend`]
///
/// # Examples
///
/// ```no_run
/// use termigit_versioning::{ObjectDatabase, ObjectType};
/// use termigit_storage::LocalBackend;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> termigit_versioning::VcsResult<()> {
///     let storage = Arc::new(LocalBackend::new(".termi-git").await?);
///     let odb = ObjectDatabase::new(storage);
///
///     let oid = odb.write(ObjectType::Blob, b"Hello, World!").await?;
///     assert_eq!(odb.read_blob(&oid).await?, b"Hello, World!");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectDatabase {
    storage: Arc<dyn StorageBackend>,
    metrics: Arc<RwLock<OdbMetrics>>,
}

impl ObjectDatabase {
    /// Create an object database on top of `storage`
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            metrics: Arc::new(RwLock::new(OdbMetrics::default())),
        }
    }

    /// Underlying storage backend
    pub fn storage(&self) -> &Arc<dyn StorageBackend> {
        &self.storage
    }

    /// Store a payload of the given type and return its id
    ///
    /// Identical content always yields the same id. If the object is already
    /// present nothing is written.
    pub async fn write(&self, obj_type: ObjectType, payload: &[u8]) -> VcsResult<Oid> {
        let oid = Oid::for_object(obj_type, payload);
        self.write_built(oid, obj_type, payload).await
    }

    /// Store a payload whose id was computed by `build_tree`/`build_commit`
    pub(crate) async fn write_built(
        &self,
        oid: Oid,
        obj_type: ObjectType,
        payload: &[u8],
    ) -> VcsResult<Oid> {
        let key = object_key(&oid);

        debug!(oid = %oid, obj_type = %obj_type, size = payload.len(), "Writing object");

        let is_new = !self.storage.exists(&key).await?;
        if is_new {
            self.storage.put(&key, &object::encode(obj_type, payload)).await?;
            info!(oid = %oid, obj_type = %obj_type, size = payload.len(), "Stored new object");
        } else {
            debug!(oid = %oid, "Object already exists (deduplicated)");
        }

        self.metrics.write().await.record_write(payload.len(), is_new);
        Ok(oid)
    }

    /// Store a blob
    pub async fn write_blob(&self, content: &[u8]) -> VcsResult<Oid> {
        self.write(ObjectType::Blob, content).await
    }

    /// Read and verify an object, returning its type and payload
    ///
    /// # Errors
    ///
    /// - [`VcsError::ObjectNotFound`] if the object is absent
    /// - [`VcsError::CorruptObject`] if the stored bytes do not hash to `oid`
    pub async fn read(&self, oid: &Oid) -> VcsResult<(ObjectType, Vec<u8>)> {
        let data = self.read_raw(oid).await?;
        let (obj_type, payload) = object::decode(&data)?;
        Ok((obj_type, payload.to_vec()))
    }

    /// Read an object that must be of `expected` type
    pub async fn read_typed(&self, oid: &Oid, expected: ObjectType) -> VcsResult<Vec<u8>> {
        let (actual, payload) = self.read(oid).await?;
        if actual != expected {
            return Err(VcsError::ObjectTypeMismatch {
                oid: *oid,
                expected,
                actual,
            });
        }
        Ok(payload)
    }

    /// Read a blob's content
    pub async fn read_blob(&self, oid: &Oid) -> VcsResult<Vec<u8>> {
        self.read_typed(oid, ObjectType::Blob).await
    }

    /// Read the encoded bytes of an object, verifying their hash
    pub async fn read_raw(&self, oid: &Oid) -> VcsResult<Vec<u8>> {
        debug!(oid = %oid, "Reading object");

        let data = match self.storage.get(&object_key(oid)).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => return Err(VcsError::ObjectNotFound(*oid)),
            Err(e) => return Err(e.into()),
        };

        verify(oid, &data)?;
        Ok(data)
    }

    /// Store already-encoded bytes under `oid`
    ///
    /// The bytes must hash to `oid` and decode as an object. Returns `false`
    /// when the object was already present.
    pub async fn write_raw(&self, oid: &Oid, data: &[u8]) -> VcsResult<bool> {
        verify(oid, data)?;
        object::decode(data)?;

        let key = object_key(oid);
        let is_new = !self.storage.exists(&key).await?;
        if is_new {
            self.storage.put(&key, data).await?;
            debug!(oid = %oid, size = data.len(), "Stored transferred object");
        }

        self.metrics.write().await.record_write(data.len(), is_new);
        Ok(is_new)
    }

    /// Check if an object exists
    pub async fn exists(&self, oid: &Oid) -> VcsResult<bool> {
        Ok(self.storage.exists(&object_key(oid)).await?)
    }

    /// Every object id in the store
    ///
    /// Keys that are not valid ids are skipped with a warning.
    pub async fn list(&self) -> VcsResult<BTreeSet<Oid>> {
        let keys = self.storage.list_objects(OBJECTS_PREFIX).await?;

        let mut oids = BTreeSet::new();
        for key in keys {
            let name = key.trim_start_matches(OBJECTS_PREFIX);
            match Oid::from_hex(name) {
                Ok(oid) => {
                    oids.insert(oid);
                }
                Err(e) => warn!(key = %key, error = %e, "Ignoring unexpected entry in object store"),
            }
        }
        Ok(oids)
    }

    /// Snapshot of the write counters
    pub async fn metrics(&self) -> OdbMetrics {
        *self.metrics.read().await
    }
}

fn verify(oid: &Oid, data: &[u8]) -> VcsResult<()> {
    let actual = Oid::hash(data);
    if actual != *oid {
        warn!(expected = %oid, computed = %actual, "Object integrity check failed");
        return Err(VcsError::CorruptObject {
            expected: *oid,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termigit_storage::MockBackend;

    fn odb() -> (MockBackend, ObjectDatabase) {
        let storage = MockBackend::new();
        let odb = ObjectDatabase::new(Arc::new(storage.clone()));
        (storage, odb)
    }

    #[tokio::test]
    async fn test_write_and_read_blob() {
        let (_storage, odb) = odb();

        let oid = odb.write_blob(b"hello").await.unwrap();
        assert_eq!(oid, Oid::for_object(ObjectType::Blob, b"hello"));
        assert_eq!(odb.read_blob(&oid).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_write_is_idempotent() {
        let (storage, odb) = odb();

        let first = odb.write_blob(b"same").await.unwrap();
        let second = odb.write_blob(b"same").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.put_count(), 1);
        let metrics = odb.metrics().await;
        assert_eq!(metrics.objects_written, 1);
        assert_eq!(metrics.duplicates_skipped, 1);
    }

    #[tokio::test]
    async fn test_existing_bytes_never_rewritten() {
        let (storage, odb) = odb();

        let oid = odb.write_blob(b"content").await.unwrap();
        let before = storage.get(&object_key(&oid)).await.unwrap();
        odb.write_blob(b"content").await.unwrap();
        let after = storage.get(&object_key(&oid)).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let (_storage, odb) = odb();
        let err = odb.read(&Oid::hash(b"nothing")).await.unwrap_err();
        assert!(matches!(err, VcsError::ObjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_type_mismatch_detected() {
        let (_storage, odb) = odb();

        let oid = odb.write(ObjectType::Tree, b"{}").await.unwrap();
        let err = odb.read_blob(&oid).await.unwrap_err();
        assert!(matches!(
            err,
            VcsError::ObjectTypeMismatch {
                expected: ObjectType::Blob,
                actual: ObjectType::Tree,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_corrupt_object_detected() {
        let (storage, odb) = odb();

        let oid = odb.write_blob(b"original").await.unwrap();
        storage
            .put(&object_key(&oid), &object::encode(ObjectType::Blob, b"tampered"))
            .await
            .unwrap();

        let err = odb.read_blob(&oid).await.unwrap_err();
        assert!(matches!(err, VcsError::CorruptObject { .. }));
    }

    #[tokio::test]
    async fn test_write_raw_verifies_hash() {
        let (_storage, odb) = odb();

        let encoded = object::encode(ObjectType::Blob, b"payload");
        let oid = Oid::hash(&encoded);
        assert!(odb.write_raw(&oid, &encoded).await.unwrap());
        assert!(!odb.write_raw(&oid, &encoded).await.unwrap());

        let wrong = Oid::hash(b"other");
        assert!(odb.write_raw(&wrong, &encoded).await.is_err());
    }

    #[tokio::test]
    async fn test_list_skips_foreign_keys() {
        let (storage, odb) = odb();

        let a = odb.write_blob(b"a").await.unwrap();
        let b = odb.write_blob(b"b").await.unwrap();
        storage.put("objects/not-an-oid", b"junk").await.unwrap();
        storage.put("HEAD", b"x").await.unwrap();

        let listed = odb.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a));
        assert!(listed.contains(&b));
    }
}
