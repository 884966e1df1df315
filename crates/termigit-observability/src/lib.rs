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
//! Structured logging for TermiGit
//!
//! Thin setup layer over `tracing-subscriber`. Library crates only emit
//! `tracing` events; the binary calls [`init_tracing`] once at startup.
//!
//! ```no_run
//! use termigit_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Compact, None).unwrap();
//! tracing::warn!("visible at the default level");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, DEFAULT_LEVEL};
pub use initialization::{init_tracing, init_tracing_with_config};
