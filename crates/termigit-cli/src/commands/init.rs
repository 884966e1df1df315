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
use crate::output;
use anyhow::{Context, Result};
use clap::Parser;
use termigit_config::{ConfigLoader, RepoConfig, Validator};
use termigit_versioning::{connect_remote, Repository, VcsError};

/// Create an empty TermiGit repository bound to a remote bucket
///
/// Checks that the bucket exists and is accessible, then creates
/// `.termi-git/` in the current directory with the remote recorded in
/// `config.json`.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Use an S3 bucket as the remote
    termi-git init --bucket my-project-bucket

    # Use an S3-compatible service
    termi-git init -b dev-bucket --endpoint http://localhost:9000

    # Use a local directory as the remote
    termi-git init -b file:///srv/termigit/my-project

ENVIRONMENT:
    AWS_REGION             default region stored in config.json
    TERMIGIT_REGION        overrides the stored region
    TERMIGIT_S3_ENDPOINT   overrides the stored endpoint")]
pub struct InitCmd {
    /// Remote bucket name, or file://<dir> for a directory remote
    #[arg(short, long, value_name = "BUCKET")]
    pub bucket: String,

    /// Bucket region (defaults to $AWS_REGION, then ap-south-1)
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
}

impl InitCmd {
    pub async fn execute(&self) -> Result<()> {
        let root = std::env::current_dir()?;

        if Repository::exists_at(&root) {
            output::info("This directory is already a TermiGit repository.");
            return Ok(());
        }

        let config = self.config();
        config.validate().context("Invalid repository configuration")?;

        let mut effective = config.clone();
        ConfigLoader::new().apply_env_overrides(&mut effective)?;

        output::progress(&format!(
            "Verifying access to bucket \"{}\"...",
            config.remote_bucket
        ));
        if let Err(e) = connect_remote(&effective).await {
            if matches!(e, VcsError::BucketUnreachable(_) | VcsError::AccessDenied(_)) {
                output::info(
                    "Please ensure the bucket exists, your credentials are correct, and you have the necessary permissions.",
                );
            }
            return Err(e.into());
        }
        output::success("Bucket found and accessible.");

        output::progress(&format!(
            "Initializing repository for bucket \"{}\"...",
            config.remote_bucket
        ));
        Repository::init(&root, &config)
            .await
            .context("Failed to create repository")?;

        output::success("Repository initialized successfully!");
        output::line("");
        output::line("Next steps:");
        output::line("  1. Add files using: termi-git add <file-path>");
        output::line("  2. Commit them using: termi-git commit \"Your message\"");
        Ok(())
    }

    fn config(&self) -> RepoConfig {
        let mut config = RepoConfig::new(&self.bucket);
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        config
    }
}
