// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command reports on stdout, as text or JSON

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report; zone text for `replay`
    Text,
    /// One pretty-printed JSON document
    Json,
}

/// Write a report to stdout
pub fn print<T: Serialize + Display>(report: &T, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    emit(&mut out, report, format)?;
    out.flush().context("failed to flush stdout")
}

/// Write a report, always ending with exactly one newline.
///
/// Zone text already ends in a newline and is written as is.
pub fn emit<W: Write, T: Serialize + Display>(
    out: &mut W,
    report: &T,
    format: OutputFormat,
) -> Result<()> {
    let mut rendered = match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to encode report as JSON")?
        }
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    out.write_all(rendered.as_bytes())
        .context("failed to write report")
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
