// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent replica simulation

use crate::config::SimulateConfig;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use zl_storage::{write_zone, Record, Replica, Wal, WalConfig, Zone};

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of concurrent replicas
    #[arg(long)]
    views: Option<usize>,
    /// Publishes per replica
    #[arg(long)]
    rounds: Option<usize>,
    /// Persist every increment to this write-ahead log
    #[arg(long)]
    wal: Option<PathBuf>,
    /// TOML settings file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Zone apex, fully qualified
    #[arg(long)]
    origin: Option<String>,
    /// Write the converged zone text here
    #[arg(long)]
    zone_out: Option<PathBuf>,
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SimulateSummary {
    origin: String,
    views: usize,
    rounds: usize,
    appended: u64,
    retired: u64,
    live: usize,
    sink_failures: u64,
    records: usize,
    converged: bool,
    wal_entries: Option<u64>,
}

impl fmt::Display for SimulateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Zone: {}", self.origin)?;
        writeln!(f, "  Views: {} x {} rounds", self.views, self.rounds)?;
        writeln!(
            f,
            "  Increments: {} appended, {} retired, {} live",
            self.appended, self.retired, self.live
        )?;
        if self.sink_failures > 0 {
            writeln!(f, "  Sink failures: {}", self.sink_failures)?;
        }
        if let Some(entries) = self.wal_entries {
            writeln!(f, "  WAL entries: {}", entries)?;
        }
        writeln!(f, "  Records: {}", self.records)?;
        write!(
            f,
            "  Converged: {}",
            if self.converged { "yes" } else { "no" }
        )
    }
}

pub fn handle(args: SimulateArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let mut zone = Zone::new(config.origin.clone(), config.commitlog.clone());
    if let Some(path) = &args.wal {
        let wal = Wal::open(path, WalConfig::default())
            .with_context(|| format!("failed to open WAL {}", path.display()))?;
        zone.bind_wal(wal);
    }

    let mut replicas = (0..config.views)
        .map(|n| zone.subscribe(format!("replica-{n}")))
        .collect::<Result<Vec<Replica>, _>>()
        .context("failed to subscribe replicas")?;

    let shared = &config;
    std::thread::scope(|scope| -> Result<()> {
        let handles: Vec<_> = replicas
            .iter_mut()
            .enumerate()
            .map(|(index, replica)| scope.spawn(move || run_replica(replica, index, shared)))
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => anyhow::bail!("replica thread panicked"),
            }
        }
        Ok(())
    })?;

    // Each replica's final sync acknowledges what the others left behind
    for replica in replicas.iter_mut() {
        replica.sync().context("final sync failed")?;
    }

    let reference = replicas
        .first()
        .map(|replica| replica.view().clone())
        .unwrap_or_default();
    let diverged: Vec<String> = replicas
        .iter()
        .filter(|replica| replica.view() != &reference)
        .map(|replica| replica.name().to_string())
        .collect();
    for name in &diverged {
        tracing::error!(replica = %name, "replica diverged");
    }

    if let Some(path) = &args.zone_out {
        write_zone(&reference, path, &config.origin, Some(config.default_ttl))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let stats = zone.stats().unwrap_or_default();
    for replica in replicas {
        replica.close()?;
    }
    let wal = zone.close()?;

    let summary = SimulateSummary {
        origin: config.origin.clone(),
        views: config.views,
        rounds: config.rounds,
        appended: stats.appended,
        retired: stats.retired,
        live: stats.live_increments,
        sink_failures: stats.sink_failures,
        records: reference.len(),
        converged: diverged.is_empty(),
        wal_entries: wal.map(|wal| wal.sequence()),
    };
    output::print(&summary, args.output)?;

    if !summary.converged {
        anyhow::bail!("{} replica(s) diverged", diverged.len());
    }
    Ok(())
}

fn resolve_config(args: &SimulateArgs) -> Result<SimulateConfig> {
    let mut config = match &args.config {
        Some(path) => SimulateConfig::load(path)?,
        None => SimulateConfig::default(),
    };
    if let Some(views) = args.views {
        config.views = views;
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(origin) = &args.origin {
        config.origin = origin.clone();
    }
    config.validate()?;
    Ok(config)
}

/// One replica's workload: every round stages a record and syncs. Every
/// fourth round also removes the previous round's record. Replica 0 opens
/// with the zone's SOA and NS.
fn run_replica(replica: &mut Replica, index: usize, config: &SimulateConfig) -> Result<()> {
    let ttl = config.default_ttl;
    if index == 0 {
        replica.add(apex_soa(config));
        replica.add(Record::new(
            config.origin.as_str(),
            ttl,
            "NS",
            format!("ns1.{}", config.origin),
        ));
    }

    for round in 0..config.rounds {
        replica.add(host_record(index, round, ttl));
        if round % 4 == 3 {
            replica.remove(host_record(index, round - 1, ttl));
        }
        replica
            .sync()
            .with_context(|| format!("{} failed in round {round}", replica.name()))?;
    }
    tracing::info!(replica = %replica.name(), records = replica.view().len(), "replica finished");
    Ok(())
}

fn apex_soa(config: &SimulateConfig) -> Record {
    let origin = &config.origin;
    Record::new(
        origin.as_str(),
        config.default_ttl,
        "SOA",
        format!(
            "ns1.{origin} hostmaster.{origin} 1 7200 3600 1209600 {}",
            config.default_ttl
        ),
    )
}

fn host_record(index: usize, round: usize, ttl: u32) -> Record {
    Record::new(
        format!("r{index}-{round}"),
        ttl,
        "A",
        format!("192.0.2.{}", index % 254 + 1),
    )
}
