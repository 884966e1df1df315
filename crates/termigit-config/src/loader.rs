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
use crate::error::{ConfigError, ConfigResult};
use crate::schema::RepoConfig;
use crate::validation::Validator;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Overrides the stored region
pub const ENV_REGION: &str = "TERMIGIT_REGION";
/// Overrides (or sets) the custom S3 endpoint
pub const ENV_ENDPOINT: &str = "TERMIGIT_S3_ENDPOINT";

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<RepoConfig> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        self.load_from_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn load_from_str(&self, content: &str) -> ConfigResult<RepoConfig> {
        let config: RepoConfig = serde_json::from_str(content)?;

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration and apply environment variable overrides
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<RepoConfig> {
        let mut config = self.load_file(path).await?;
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Apply `TERMIGIT_REGION` and `TERMIGIT_S3_ENDPOINT`
    pub fn apply_env_overrides(&self, config: &mut RepoConfig) -> ConfigResult<()> {
        self.apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn apply_overrides_from<F>(&self, config: &mut RepoConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_REGION).filter(|v| !v.is_empty()) {
            debug!(region = %value, "Region overridden from environment");
            config.region = value;
        }
        if let Some(value) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            debug!(endpoint = %value, "Endpoint overridden from environment");
            config.endpoint = Some(value);
        }

        if self.validate {
            config.validate()?;
        }
        Ok(())
    }

    /// Write configuration as pretty-printed JSON
    pub async fn save<P: AsRef<Path>>(&self, path: P, config: &RepoConfig) -> ConfigResult<()> {
        let path = path.as_ref();

        if self.validate {
            config.validate()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content).await?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
