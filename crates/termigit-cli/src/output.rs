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
//! Shared output formatting utilities for CLI commands.
//!
//! Everything except [`error`] goes to stdout and is suppressed by
//! `--quiet`. Errors always reach stderr.

use console::style;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence all non-error output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Whether `--quiet` is in effect.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message with green checkmark.
///
/// ```text
/// ✅ Repository initialized successfully!
/// ```
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("✅").green().bold(), msg);
    }
}

/// Print an error message to stderr with red X.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("❌").red().bold(), msg);
}

/// Print an informational message.
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("ℹ️").cyan(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("⚠️").yellow(), msg);
    }
}

/// Print a detail line with key-value formatting.
///
/// ```text
///   Uploaded: 3
/// ```
pub fn detail(key: &str, value: &str) {
    if !is_quiet() {
        println!("  {}: {}", key, style(value).cyan());
    }
}

/// Print a progress indicator message.
pub fn progress(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("🔄").cyan(), msg);
    }
}

/// Print an unadorned line.
pub fn line(msg: &str) {
    if !is_quiet() {
        println!("{}", msg);
    }
}
