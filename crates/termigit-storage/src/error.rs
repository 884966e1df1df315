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

//! Error types for storage backends

use std::io;
use thiserror::Error;

/// Result alias used by every [`StorageBackend`](crate::StorageBackend) method
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced by storage backends
#[derive(Error, Debug)]
pub enum StorageError {
    /// No object is stored under the key
    #[error("object not found: {0}")]
    NotFound(String),

    /// The credentials in use may not perform the operation
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The bucket (or remote directory) does not exist
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid key format (empty, absolute, escapes the root)
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Backend reported a failure that has no more specific variant
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Transparent wrapper for anything else
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a NotFound error with the given key
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        StorageError::NotFound(key.into())
    }

    /// Create a PermissionDenied error with context
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        StorageError::PermissionDenied(msg.into())
    }

    /// Create a BucketNotFound error for the named bucket
    pub fn bucket_not_found<S: Into<String>>(bucket: S) -> Self {
        StorageError::BucketNotFound(bucket.into())
    }

    /// Create an InvalidKey error with context
    pub fn invalid_key<S: Into<String>>(msg: S) -> Self {
        StorageError::InvalidKey(msg.into())
    }

    /// Create a Backend error with context
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        StorageError::Backend(msg.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Check if this is a PermissionDenied error
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StorageError::PermissionDenied(_))
    }

    /// Check if this is a BucketNotFound error
    pub fn is_bucket_not_found(&self) -> bool {
        matches!(self, StorageError::BucketNotFound(_))
    }

    /// Check if this is an InvalidKey error
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, StorageError::InvalidKey(_))
    }
}
