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

//! Repository discovery and environment helpers shared by commands.

use anyhow::Result;
use termigit_versioning::Repository;

/// Open the repository containing the current directory.
pub async fn open_repo() -> Result<Repository> {
    let cwd = std::env::current_dir()?;
    Ok(Repository::discover(&cwd).await?)
}

/// Commit author: `TERMIGIT_AUTHOR_NAME`, then the OS user, then "unknown".
pub fn author_name() -> String {
    author_from(|name| std::env::var(name).ok())
}

fn author_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["TERMIGIT_AUTHOR_NAME", "USER", "USERNAME"]
        .into_iter()
        .filter_map(&lookup)
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
