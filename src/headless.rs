//! Batch runner: ticks a world at a fixed step without a terminal and
//! optionally streams every event as a JSON line.

use crate::app::ShutdownManager;
use anyhow::Result;
use outbreak_core::metrics::counters;
use outbreak_core::World;
use outbreak_data::HudStats;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessOptions {
    pub ticks: u64,
    /// Simulated seconds per tick.
    pub dt: f64,
    pub json_events: bool,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            ticks: 3000,
            dt: 1.0 / 30.0,
            json_events: false,
        }
    }
}

/// Totals reported when a headless run ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessSummary {
    pub ticks: u64,
    pub clock: f64,
    pub hud: HudStats,
    pub spawned: u64,
    pub removed: u64,
    pub shots: u64,
    pub conversions: u64,
    /// True when a shutdown request cut the run short.
    pub interrupted: bool,
}

pub fn run_headless<W: Write>(
    world: &mut World,
    options: &HeadlessOptions,
    shutdown: &ShutdownManager,
    out: &mut W,
) -> Result<HeadlessSummary> {
    let mut interrupted = false;
    for _ in 0..options.ticks {
        if shutdown.is_shutdown_requested() {
            interrupted = true;
            break;
        }
        let events = world.tick(options.dt)?;
        if options.json_events {
            for event in &events {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;

    let metrics = world.metrics();
    let summary = HeadlessSummary {
        ticks: world.tick_count(),
        clock: world.clock(),
        hud: world.hud(),
        spawned: metrics.counter(counters::SPAWNED),
        removed: metrics.counter(counters::REMOVED),
        shots: metrics.counter(counters::SHOTS),
        conversions: metrics.counter(counters::CONVERSIONS),
        interrupted,
    };
    tracing::info!(
        ticks = summary.ticks,
        hostiles = summary.hud.hostiles,
        survivors = summary.hud.survivors,
        interrupted,
        "Headless run finished"
    );
    Ok(summary)
}
