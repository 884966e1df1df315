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

//! Commit objects
//!
//! A commit points at one tree and at most one parent. History is a single
//! linked list ending at the root commit, whose `parent` is `None`.

use crate::error::VcsResult;
use crate::object::ObjectType;
use crate::odb::ObjectDatabase;
use crate::oid::Oid;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit object
///
/// Field order is fixed, which keeps the JSON payload (and therefore the
/// commit id) stable for identical inputs.
///
/// # Examples
///
/// ```no_run
/// use termigit_versioning::{Commit, ObjectDatabase, Tree};
/// use termigit_storage::MockBackend;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> termigit_versioning::VcsResult<()> {
///     let odb = ObjectDatabase::new(Arc::new(MockBackend::new()));
///     let tree_oid = Tree::new().write(&odb).await?;
///
///     let commit = Commit::new(tree_oid, None, "alice", "Initial commit");
///     let oid = commit.write(&odb).await?;
///
///     let loaded = Commit::read(&odb, &oid).await?;
///     assert!(loaded.is_initial());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Snapshot recorded by this commit
    pub tree: Oid,

    /// Previous commit, `None` for the root
    pub parent: Option<Oid>,

    /// OS user that created the commit
    pub author: String,

    /// Commit message
    pub message: String,

    /// Creation time, ISO-8601 in UTC with millisecond precision
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Create a commit stamped with the current time
    pub fn new(
        tree: Oid,
        parent: Option<Oid>,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(tree, parent, author, message, Utc::now())
    }

    /// Create a commit with an explicit timestamp
    pub fn with_timestamp(
        tree: Oid,
        parent: Option<Oid>,
        author: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tree,
            parent,
            author: author.into(),
            message: message.into(),
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Whether this is the root commit
    pub fn is_initial(&self) -> bool {
        self.parent.is_none()
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Serialize commit to its payload bytes
    pub fn serialize(&self) -> VcsResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a commit payload
    pub fn deserialize(data: &[u8]) -> VcsResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Id and payload this commit is stored as
    pub fn encode(&self) -> VcsResult<(Oid, Vec<u8>)> {
        let payload = self.serialize()?;
        Ok((Oid::for_object(ObjectType::Commit, &payload), payload))
    }

    /// Write commit to object database and return its OID
    pub async fn write(&self, odb: &ObjectDatabase) -> VcsResult<Oid> {
        let (oid, payload) = self.encode()?;
        odb.write_built(oid, ObjectType::Commit, &payload).await
    }

    /// Read commit from object database by OID
    pub async fn read(odb: &ObjectDatabase, oid: &Oid) -> VcsResult<Self> {
        let data = odb.read_typed(oid, ObjectType::Commit).await?;
        Self::deserialize(&data)
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

/// Stamp a new commit and return its id with the payload to store
pub fn build_commit(
    tree: Oid,
    parent: Option<Oid>,
    author: &str,
    message: &str,
) -> VcsResult<(Oid, Vec<u8>)> {
    Commit::new(tree, parent, author, message).encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use termigit_storage::MockBackend;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn test_commit_creation() {
        let tree = Oid::hash(b"tree");
        let commit = Commit::new(tree, None, "alice", "Initial commit");

        assert_eq!(commit.tree, tree);
        assert!(commit.is_initial());
        assert_eq!(commit.author, "alice");
    }

    #[test]
    fn test_commit_with_parent() {
        let parent = Oid::hash(b"parent");
        let commit = Commit::new(Oid::hash(b"tree"), Some(parent), "bob", "Second");
        assert!(!commit.is_initial());
        assert_eq!(commit.parent, Some(parent));
    }

    #[test]
    fn test_timestamp_has_millisecond_precision() {
        let commit = Commit::new(Oid::hash(b"t"), None, "a", "m");
        assert_eq!(commit.timestamp.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_payload_field_order() {
        let tree = Oid::hash(b"tree");
        let commit = Commit::with_timestamp(tree, None, "alice", "first", fixed_time());
        let json = String::from_utf8(commit.serialize().unwrap()).unwrap();

        assert_eq!(
            json,
            format!(
                "{{\"tree\":\"{}\",\"parent\":null,\"author\":\"alice\",\"message\":\"first\",\"timestamp\":\"2025-03-14T15:09:26Z\"}}",
                tree
            )
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let commit = Commit::with_timestamp(
            Oid::hash(b"tree"),
            Some(Oid::hash(b"p")),
            "alice",
            "multi\nline",
            fixed_time(),
        );
        let back = Commit::deserialize(&commit.serialize().unwrap()).unwrap();
        assert_eq!(back, commit);
        assert_eq!(back.summary(), "multi");
    }

    #[test]
    fn test_build_commit_id_matches_payload() {
        let (oid, payload) = build_commit(Oid::hash(b"tree"), None, "alice", "msg").unwrap();
        assert_eq!(oid, Oid::for_object(ObjectType::Commit, &payload));
    }

    #[tokio::test]
    async fn test_commit_odb_roundtrip() {
        let odb = ObjectDatabase::new(Arc::new(MockBackend::new()));
        let commit = Commit::new(Oid::hash(b"tree"), None, "alice", "Initial");

        let oid = commit.write(&odb).await.unwrap();
        assert_eq!(Commit::read(&odb, &oid).await.unwrap(), commit);
    }

    #[tokio::test]
    async fn test_write_stores_encoded_payload() {
        let odb = ObjectDatabase::new(Arc::new(MockBackend::new()));
        let commit = Commit::with_timestamp(
            Oid::hash(b"tree"),
            Some(Oid::hash(b"parent")),
            "alice",
            "Second",
            fixed_time(),
        );

        let (expected, payload) = commit.encode().unwrap();
        let oid = commit.write(&odb).await.unwrap();
        assert_eq!(oid, expected);

        let (obj_type, stored) = odb.read(&oid).await.unwrap();
        assert_eq!(obj_type, ObjectType::Commit);
        assert_eq!(stored, payload);
    }
}
