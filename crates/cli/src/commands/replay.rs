// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialize a write-ahead log into zone text

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use zl_storage::{Record, WalReader, ZoneView};

#[derive(Args)]
pub struct ReplayArgs {
    /// Write-ahead log to read
    #[arg(long)]
    wal: PathBuf,
    /// Zone apex, fully qualified
    #[arg(long, default_value = "example.org.")]
    origin: String,
    /// Emit a $TTL line with this default
    #[arg(long)]
    ttl: Option<u32>,
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// The replayed zone: zone text as text, its records as JSON
#[derive(Debug, Serialize)]
struct ReplaySummary {
    origin: String,
    entries: usize,
    last_sequence: Option<u64>,
    records: Vec<Record>,
    #[serde(skip)]
    zone_text: String,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.zone_text)
    }
}

pub fn handle(args: ReplayArgs) -> Result<()> {
    let reader = WalReader::open(&args.wal)?;
    let entries = reader
        .valid_entries()
        .with_context(|| format!("failed to read {}", reader.path().display()))?;

    let mut view = ZoneView::new();
    for entry in &entries {
        view.apply(&entry.changes);
    }
    tracing::info!(entries = entries.len(), records = view.len(), "WAL replayed");

    let summary = ReplaySummary {
        zone_text: view.render(&args.origin, args.ttl),
        origin: args.origin,
        entries: entries.len(),
        last_sequence: entries.last().map(|entry| entry.sequence),
        records: view.records().collect(),
    };
    output::print(&summary, args.output)
}
