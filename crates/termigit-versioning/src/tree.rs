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

//! Tree objects: the full set of tracked files at one commit
//!
//! A tree is a flat map from repository-relative path (always `/`-separated)
//! to blob id. The payload is compact JSON with keys in sorted order, so
//! the same file set hashes to the same tree id no matter in which order the
//! files were staged.

use crate::error::VcsResult;
use crate::object::ObjectType;
use crate::odb::ObjectDatabase;
use crate::oid::Oid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of tracked paths and their blob ids
///
/// # Examples
///
/// ```
/// use termigit_versioning::{Oid, Tree};
///
/// let mut first = Tree::new();
/// first.insert("b.txt", Oid::hash(b"2"));
/// first.insert("a.txt", Oid::hash(b"1"));
///
/// let mut second = Tree::new();
/// second.insert("a.txt", Oid::hash(b"1"));
/// second.insert("b.txt", Oid::hash(b"2"));
///
/// assert_eq!(first.id().unwrap(), second.id().unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    entries: BTreeMap<String, Oid>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from staged entries
    pub fn from_entries(entries: BTreeMap<String, Oid>) -> Self {
        Self { entries }
    }

    /// Insert or replace the blob for `path`
    pub fn insert(&mut self, path: impl Into<String>, oid: Oid) {
        self.entries.insert(path.into(), oid);
    }

    /// Blob id recorded for `path`
    pub fn get(&self, path: &str) -> Option<&Oid> {
        self.entries.get(path)
    }

    /// Whether `path` is tracked
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in sorted path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Oid)> {
        self.entries.iter()
    }

    /// Distinct blob ids referenced by the tree
    pub fn blob_ids(&self) -> impl Iterator<Item = &Oid> {
        self.entries.values()
    }

    /// Number of tracked paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree tracks nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths tracked here but absent from `target`
    pub fn paths_missing_from<'a>(&'a self, target: &'a Tree) -> impl Iterator<Item = &'a String> {
        self.entries.keys().filter(move |path| !target.contains(path))
    }

    /// Canonical payload bytes
    pub fn serialize(&self) -> VcsResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.entries)?)
    }

    /// Parse a tree payload
    pub fn deserialize(data: &[u8]) -> VcsResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Id this tree would be stored under
    pub fn id(&self) -> VcsResult<Oid> {
        Ok(build_tree(self)?.0)
    }

    /// Write tree to object database and return its OID
    pub async fn write(&self, odb: &ObjectDatabase) -> VcsResult<Oid> {
        let (oid, payload) = build_tree(self)?;
        odb.write_built(oid, ObjectType::Tree, &payload).await
    }

    /// Read tree from object database by OID
    pub async fn read(odb: &ObjectDatabase, oid: &Oid) -> VcsResult<Self> {
        let data = odb.read_typed(oid, ObjectType::Tree).await?;
        Self::deserialize(&data)
    }
}

/// Canonicalize a tree and return its id with the payload to store
pub fn build_tree(tree: &Tree) -> VcsResult<(Oid, Vec<u8>)> {
    let payload = tree.serialize()?;
    Ok((Oid::for_object(ObjectType::Tree, &payload), payload))
}
