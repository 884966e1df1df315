use crate::error::{ConfigError, ConfigResult};
use crate::schema::RepoConfig;

/// Prefix marking a directory remote
const FILE_SCHEME: &str = "file://";

/// Validator for configuration settings
pub trait Validator {
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for RepoConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.remote_bucket.trim().is_empty() {
            return Err(ConfigError::MissingRequired("remoteBucket".to_string()));
        }

        if let Some(dir) = self.remote_bucket.strip_prefix(FILE_SCHEME) {
            if dir.is_empty() {
                return Err(ConfigError::invalid_value(
                    "remoteBucket",
                    "file:// remote must name a directory",
                ));
            }
        } else if !is_valid_bucket_name(&self.remote_bucket) {
            return Err(ConfigError::invalid_value(
                "remoteBucket",
                format!(
                    "'{}' is not a valid bucket name (3-63 chars: lowercase letters, digits, '.', '-')",
                    self.remote_bucket
                ),
            ));
        }

        if self.region.is_empty() {
            return Err(ConfigError::MissingRequired("region".to_string()));
        }

        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    "endpoint",
                    format!("must be an http(s) URL, got {}", endpoint),
                ));
            }
        }

        Ok(())
    }
}

fn is_valid_bucket_name(name: &str) -> bool {
    let len_ok = (3..=63).contains(&name.len());
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let edges_ok = name
        .chars()
        .next()
        .zip(name.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    len_ok && chars_ok && edges_ok
}
