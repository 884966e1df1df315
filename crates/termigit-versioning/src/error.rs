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

//! Error taxonomy for repository operations

use crate::object::ObjectType;
use crate::oid::Oid;
use std::io;
use std::path::PathBuf;
use termigit_config::ConfigError;
use termigit_storage::StorageError;
use thiserror::Error;

/// Result alias for repository operations
pub type VcsResult<T> = Result<T, VcsError>;

/// Everything a repository operation can fail with
#[derive(Error, Debug)]
pub enum VcsError {
    /// No `.termi-git` directory at or above the starting directory
    #[error("Not a TermiGit repository (or any parent up to {}). Run 'termi-git init' first.", .0.display())]
    NotARepository(PathBuf),

    /// `init` found an existing `.termi-git` directory
    #[error("This directory is already a TermiGit repository: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Commit attempted with nothing staged
    #[error("Nothing to commit, staging area is empty.")]
    EmptyIndex,

    /// Object missing from the local store
    #[error("object not found: {0}")]
    ObjectNotFound(Oid),

    /// Remote has no HEAD yet
    #[error("Remote repository seems empty or 'HEAD' is missing. Have you pushed yet?")]
    RemoteEmpty,

    /// Remote is missing a key the object graph refers to
    #[error("remote is missing key '{0}'")]
    NoSuchRemoteKey(String),

    /// Hash prefix matches more than one commit
    #[error("hash prefix '{prefix}' is ambiguous ({} commits match)", .candidates.len())]
    AmbiguousHash {
        /// The prefix given by the user
        prefix: String,
        /// Every commit sharing the prefix
        candidates: Vec<Oid>,
    },

    /// Hash prefix matches no commit
    #[error("Commit with hash starting '{0}' not found.")]
    CommitNotFound(String),

    /// Bucket does not exist
    #[error("The bucket \"{0}\" does not exist.")]
    BucketUnreachable(String),

    /// Credentials may not access the bucket
    #[error("Access denied. You do not have permission to access the bucket \"{0}\".")]
    AccessDenied(String),

    /// `add` target does not exist
    #[error("File not found at '{}'. Please check the path.", .0.display())]
    FileNotFound(PathBuf),

    /// Push with no local commits
    #[error("No commits found. Run 'termi-git commit' before pushing.")]
    NothingToPush,

    /// Another process holds the repository lock
    #[error(
        "Repository is locked by another termi-git process (pid {holder}). \
         If no termi-git process is running, delete {} and retry.",
        path.display()
    )]
    RepositoryLocked {
        /// Lock file to delete when the holder is gone
        path: PathBuf,
        /// Pid recorded by the holder, `unknown` if unreadable
        holder: String,
    },

    /// Stored bytes do not hash to their key
    #[error("corrupt object {expected}: content hashes to {actual}")]
    CorruptObject {
        /// Key the object was stored under
        expected: Oid,
        /// Hash of the bytes actually found
        actual: Oid,
    },

    /// Object exists but carries a different type tag
    #[error("object {oid} is a {actual}, expected a {expected}")]
    ObjectTypeMismatch {
        /// Object that was read
        oid: Oid,
        /// Type the caller asked for
        expected: ObjectType,
        /// Type recorded in the object header
        actual: ObjectType,
    },

    /// Bytes could not be decoded as an object
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// Path is outside the working tree or otherwise unusable
    #[error("invalid path '{}': {reason}", .path.display())]
    InvalidPath {
        /// The offending path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Repository configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error on the working tree or repository files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in the index or an object payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VcsError {
    /// Create an InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VcsError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidObject error
    pub fn invalid_object(msg: impl Into<String>) -> Self {
        VcsError::InvalidObject(msg.into())
    }

    /// Check if this is an EmptyIndex error
    pub fn is_empty_index(&self) -> bool {
        matches!(self, VcsError::EmptyIndex)
    }

    /// Check if this is a NotARepository error
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, VcsError::NotARepository(_))
    }

    /// Check if this error means something was not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VcsError::ObjectNotFound(_)
                | VcsError::CommitNotFound(_)
                | VcsError::NoSuchRemoteKey(_)
                | VcsError::FileNotFound(_)
        ) || matches!(self, VcsError::Storage(e) if e.is_not_found())
    }
}
