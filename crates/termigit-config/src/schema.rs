use serde::{Deserialize, Serialize};

/// Region used when neither the config file nor the environment names one
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Repository configuration, persisted as `.termi-git/config.json`
///
/// The remote is named by `remoteBucket`; the older `s3Bucket` key is still
/// read. A value of the form `file://<dir>` selects a directory remote
/// instead of an S3 bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Bucket (or `file://` directory) acting as the remote
    #[serde(rename = "remoteBucket", alias = "s3Bucket")]
    pub remote_bucket: String,

    /// AWS region of the bucket
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom S3-compatible endpoint (MinIO, LocalStack, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl RepoConfig {
    /// Config for `bucket` in the default region
    pub fn new(bucket: impl Into<String>) -> Self {
        RepoConfig {
            remote_bucket: bucket.into(),
            region: default_region(),
            endpoint: None,
        }
    }

    /// Set the custom endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

/// `AWS_REGION`, falling back to [`DEFAULT_REGION`]
pub fn default_region() -> String {
    std::env::var("AWS_REGION")
        .ok()
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let config = RepoConfig::new("my-bucket").with_region("eu-west-1");
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["remoteBucket"], "my-bucket");
        assert!(json.get("s3Bucket").is_none());
        assert_eq!(json["region"], "eu-west-1");
        assert!(json.get("endpoint").is_none());
    }

    #[test]
    fn test_alias_and_defaults() {
        let config: RepoConfig = serde_json::from_str(r#"{"s3Bucket": "b"}"#).unwrap();
        assert_eq!(config.remote_bucket, "b");
        assert!(!config.region.is_empty());
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_builder() {
        let config = RepoConfig::new("b").with_endpoint("http://localhost:9000");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
    }
}
