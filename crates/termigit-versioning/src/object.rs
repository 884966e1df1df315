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

//! Object types and the tagged on-disk encoding
//!
//! Every stored object is `"<type> <payload-len>\0"` followed by the payload.
//! The type tag is read back explicitly, never inferred from the payload, so
//! a tree that happens to contain a path named `tree` cannot be mistaken for
//! a commit.

use crate::error::{VcsError, VcsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object types in the TermiGit object database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Raw file content
    Blob,
    /// Path to blob mapping for one snapshot
    Tree,
    /// Snapshot metadata with an optional parent
    Commit,
}

impl ObjectType {
    /// Get the type as a string identifier
    ///
    /// ```
    /// use termigit_versioning::ObjectType;
    ///
    /// assert_eq!(ObjectType::Blob.as_str(), "blob");
    /// assert_eq!(ObjectType::Commit.as_str(), "commit");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parse object type from its string identifier
    pub fn parse(s: &str) -> VcsResult<Self> {
        match s {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(VcsError::invalid_object(format!("unknown object type: {}", s))),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header bytes that precede a payload of `len` bytes
pub fn header(obj_type: ObjectType, len: usize) -> Vec<u8> {
    format!("{} {}\0", obj_type.as_str(), len).into_bytes()
}

/// Encode a payload with its type header
pub fn encode(obj_type: ObjectType, payload: &[u8]) -> Vec<u8> {
    let mut out = header(obj_type, payload.len());
    out.extend_from_slice(payload);
    out
}

/// Split encoded bytes into their type and payload
///
/// # Errors
///
/// [`VcsError::InvalidObject`] when the header is missing, names an unknown
/// type, or disagrees with the payload length.
pub fn decode(data: &[u8]) -> VcsResult<(ObjectType, &[u8])> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| VcsError::invalid_object("missing object header"))?;

    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| VcsError::invalid_object("object header is not UTF-8"))?;
    let (type_str, len_str) = header
        .split_once(' ')
        .ok_or_else(|| VcsError::invalid_object(format!("malformed header '{}'", header)))?;

    let obj_type = ObjectType::parse(type_str)?;
    let len: usize = len_str
        .parse()
        .map_err(|_| VcsError::invalid_object(format!("bad length in header '{}'", header)))?;

    let payload = &data[nul + 1..];
    if payload.len() != len {
        return Err(VcsError::invalid_object(format!(
            "header declares {} bytes, found {}",
            len,
            payload.len()
        )));
    }

    Ok((obj_type, payload))
}
