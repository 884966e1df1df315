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

//! AWS S3 storage backend implementation
//!
//! - Credentials come from the standard AWS chain (environment, profile, IAM)
//! - The region is taken from the repository configuration when set
//! - A custom endpoint selects an S3-compatible service and switches to
//!   path-style addressing
//!
//! Failed requests are surfaced immediately. The SDK's own retry layer is
//! disabled so a push or pull never silently repeats an upload.
//!
//! # Examples
//!
//! ```rust,no_run
//! use termigit_storage::{StorageBackend, s3::{S3Backend, S3Config}};
//!
//! #[tokio::main]
//! async fn main() -> termigit_storage::StorageResult<()> {
//!     let storage = S3Backend::with_config(S3Config::new("my-bucket")).await?;
//!     storage.verify_bucket().await?;
//!     storage.put("HEAD", b"0123abcd").await?;
//!     Ok(())
//! }
//! ```

use crate::{StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Configuration for the S3 backend
#[derive(Clone, Debug, Default)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// AWS region; falls back to the SDK's region chain when `None`
    pub region: Option<String>,

    /// Optional custom S3 endpoint (for S3-compatible services like MinIO)
    pub endpoint: Option<String>,
}

impl S3Config {
    /// Configuration for `bucket` with region and endpoint left to the SDK
    pub fn new(bucket: impl Into<String>) -> Self {
        S3Config {
            bucket: bucket.into(),
            ..Self::default()
        }
    }
}

/// AWS S3 storage backend
#[derive(Clone)]
pub struct S3Backend {
    client: Client,
    config: Arc<S3Config>,
}

impl S3Backend {
    /// Build a client for the configured bucket
    ///
    /// No request is sent; call [`S3Backend::verify_bucket`] to check access.
    pub async fn with_config(config: S3Config) -> StorageResult<Self> {
        if config.bucket.is_empty() {
            return Err(StorageError::backend("bucket name cannot be empty"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            debug!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        debug!(
            bucket = %config.bucket,
            region = ?sdk_config.region(),
            "Created S3 client"
        );

        Ok(S3Backend {
            client,
            config: Arc::new(config),
        })
    }

    /// Bucket this backend talks to
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Check that the bucket exists and is accessible with `HeadBucket`
    ///
    /// # Errors
    ///
    /// - [`StorageError::BucketNotFound`] when S3 answers 404
    /// - [`StorageError::PermissionDenied`] when S3 answers 403
    pub async fn verify_bucket(&self) -> StorageResult<()> {
        let bucket = self.bucket();

        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => {
                debug!(bucket = %bucket, "Bucket is accessible");
                Ok(())
            }
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                let status = err.raw_response().map(|r| r.status().as_u16());

                if not_found || status == Some(404) {
                    Err(StorageError::bucket_not_found(bucket))
                } else {
                    Err(Self::map_status(status, bucket, &DisplayErrorContext(&err)))
                }
            }
        }
    }

    fn validate_key(key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::invalid_key("key cannot be empty"));
        }
        if key.starts_with('/') {
            return Err(StorageError::invalid_key("key cannot start with '/'"));
        }
        Ok(())
    }

    fn map_status(status: Option<u16>, subject: &str, detail: &dyn fmt::Display) -> StorageError {
        match status {
            Some(403) => StorageError::permission_denied(subject),
            Some(404) => StorageError::not_found(subject),
            _ => StorageError::backend(format!("{}: {}", subject, detail)),
        }
    }
}

impl fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Backend")
            .field("bucket", &self.config.bucket)
            .field("region", &self.config.region)
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        Self::validate_key(key)?;
        debug!(key = %key, "Getting object from S3");

        let response = match self
            .client
            .get_object()
            .bucket(self.bucket())
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let no_such_key = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if no_such_key {
                    return Err(StorageError::not_found(key));
                }
                let status = err.raw_response().map(|r| r.status().as_u16());
                return Err(Self::map_status(status, key, &DisplayErrorContext(&err)));
            }
        };

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::backend(format!("failed to read body of {}: {}", key, e)))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        Self::validate_key(key)?;
        debug!(key = %key, size = data.len(), "Putting object to S3");

        self.client
            .put_object()
            .bucket(self.bucket())
            .key(key)
            .body(ByteStream::from(Bytes::copy_from_slice(data)))
            .send()
            .await
            .map_err(|err| {
                let status = err.raw_response().map(|r| r.status().as_u16());
                Self::map_status(status, key, &DisplayErrorContext(&err))
            })?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Self::validate_key(key)?;

        match self
            .client
            .head_object()
            .bucket(self.bucket())
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                let status = err.raw_response().map(|r| r.status().as_u16());

                if not_found || status == Some(404) {
                    Ok(false)
                } else {
                    Err(Self::map_status(status, key, &DisplayErrorContext(&err)))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        Self::validate_key(key)?;

        self.client
            .delete_object()
            .bucket(self.bucket())
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let status = err.raw_response().map(|r| r.status().as_u16());
                Self::map_status(status, key, &DisplayErrorContext(&err))
            })?;
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        debug!(prefix = %prefix, "Listing objects in S3");

        let mut result = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(self.bucket());
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| {
                let status = err.raw_response().map(|r| r.status().as_u16());
                Self::map_status(status, self.bucket(), &DisplayErrorContext(&err))
            })?;

            for obj in response.contents() {
                if let Some(key) = obj.key() {
                    result.push(key.to_string());
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(|t| t.to_string());
            } else {
                break;
            }
        }

        result.sort();
        Ok(result)
    }
}
