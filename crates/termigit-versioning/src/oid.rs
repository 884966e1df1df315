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

//! Object Identifier (OID) for content-addressable storage
//!
//! An OID is the SHA-256 digest of an object's encoded bytes (type header
//! plus payload, see [`crate::object`]). It is always rendered as 64
//! lowercase hex characters, both on disk and in remote keys, so prefix
//! matching behaves the same everywhere.

use crate::object::ObjectType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of an OID rendered as hex
pub const OID_HEX_LEN: usize = 64;

/// Number of hex characters shown in abbreviated output
pub const SHORT_OID_LEN: usize = 7;

/// Object Identifier - SHA-256 hash of object content
///
/// # Examples
///
/// ```
/// use termigit_versioning::Oid;
///
/// let oid = Oid::hash(b"Hello, World!");
/// assert_eq!(oid.to_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid([u8; 32]);

impl Oid {
    /// Hash arbitrary bytes
    pub fn hash(data: &[u8]) -> Self {
        let result = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Oid(bytes)
    }

    /// Id of an object of `obj_type` with the given payload
    ///
    /// Equal to `Oid::hash` over the encoded object, without building the
    /// encoded buffer.
    ///
    /// ```
    /// use termigit_versioning::{Oid, ObjectType};
    /// use termigit_versioning::object::encode;
    ///
    /// let payload = b"hello";
    /// assert_eq!(
    ///     Oid::for_object(ObjectType::Blob, payload),
    ///     Oid::hash(&encode(ObjectType::Blob, payload)),
    /// );
    /// ```
    pub fn for_object(obj_type: ObjectType, payload: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(crate::object::header(obj_type, payload.len()));
        hasher.update(payload);
        let result = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Oid(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First seven hex characters, for display
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_OID_LEN);
        hex
    }

    /// Parse a full 64-character hex digest
    ///
    /// Surrounding whitespace is ignored so the contents of a `HEAD` file
    /// can be passed directly.
    pub fn from_hex(s: &str) -> Result<Self, ParseOidError> {
        let s = s.trim();
        if s.len() != OID_HEX_LEN {
            return Err(ParseOidError(format!(
                "expected {} hex characters, got {}",
                OID_HEX_LEN,
                s.len()
            )));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ParseOidError(format!("'{}': {}", s, e)))?;
        Ok(Oid(bytes))
    }

    /// Whether this OID's hex form starts with `prefix` (case-insensitive)
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }
}

/// Error returned when a string is not a valid OID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOidError(String);

impl fmt::Display for ParseOidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid object id: {}", self.0)
    }
}

impl std::error::Error for ParseOidError {}

impl FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Oid::from_hex(s)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.to_hex())
    }
}

impl Serialize for Oid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Oid::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
