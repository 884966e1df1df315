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
//! Repository configuration for TermiGit
//!
//! Each repository stores its remote settings in `.termi-git/config.json`:
//!
//! ```json
//! {
//!   "remoteBucket": "my-bucket",
//!   "region": "ap-south-1"
//! }
//! ```
//!
//! `AWS_REGION` supplies the default region when a config is created.
//! `TERMIGIT_REGION` and `TERMIGIT_S3_ENDPOINT` override the stored values
//! at load time.
//!
//! # Example
//!
//! ```no_run
//! use termigit_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ConfigLoader::new();
//!     let config = loader.load_with_overrides(".termi-git/config.json").await?;
//!
//!     println!("Remote bucket: {} ({})", config.remote_bucket, config.region);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ENV_ENDPOINT, ENV_REGION};
pub use schema::*;
pub use validation::Validator;
