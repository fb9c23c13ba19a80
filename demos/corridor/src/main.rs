//! corridor: one simulated day on the four-segment highway.
//!
//! Vehicles arrive at both ends, travel the whole highway and wait on the
//! shoulders when the next segment refuses them.  Segment 2 is shared: it
//! holds up to two cars or one truck, never both classes at once.
//!
//! Usage: `corridor [config.json]`.  Without a file the default day runs
//! (500 vehicles per simulated hour, 30 s per hour, about 12 minutes).
//! `demos/corridor/quick.json` compresses the same day into under a minute.
//! Set `RUST_LOG=debug` to follow individual vehicles.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hw_core::HighwayConfig;
use hw_output::{CsvWriter, OutputWriter, StatsReport, TrafficStats};
use hw_sim::SimBuilder;

const OUTPUT_DIR: &str = "output/corridor";

fn load_config() -> Result<HighwayConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(HighwayConfig::default());
    };
    let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    // 1. Configuration.
    let config = load_config()?;

    println!("=== corridor: highway admission control ===");
    println!(
        "Capacities: {:?}  |  Shared: segment {} ({} cars / {} truck)",
        config.capacities,
        config.shared_segment + 1,
        config.shared_limits.cars,
        config.shared_limits.trucks,
    );
    println!(
        "Traffic: {} vehicles/h × {} h  |  {:.1} s per hour  |  Seed: {}",
        config.vehicles_per_hour, config.sim_hours, config.secs_per_hour, config.seed
    );
    println!();

    // 2. Build and run.
    let stats = Arc::new(TrafficStats::for_config(&config));
    let sim = SimBuilder::new(config, Arc::clone(&stats)).build()?;
    let run = sim.run()?;

    println!(
        "Run finished in {:.3} s ({})",
        run.elapsed.as_secs_f64(),
        run.stop
    );
    println!(
        "  spawned {}  |  completed {}  |  still on the road {}  |  shoulder stops {}",
        run.spawned, run.completed, run.still_running, run.shoulder_stops
    );
    println!();

    // 3. Report.
    let report = StatsReport::build(&stats, sim.highway());

    println!("{:<8} {:>9} {:>9} {:>9}", "Hour", "Forward", "Backward", "Total");
    println!("{}", "-".repeat(38));
    for row in &report.hourly {
        println!(
            "{:<8} {:>9} {:>9} {:>9}",
            format!("{:02}:00", row.hour),
            row.forward,
            row.backward,
            row.total()
        );
    }
    println!("Total vehicles for the day: {}", report.total_vehicles);
    println!();

    println!("{:<8} {:>8} {:>9} {:>9} {:>9}", "Segment", "Capacity", "Forward", "Backward", "Total");
    println!("{}", "-".repeat(47));
    for row in &report.segments {
        println!(
            "{:<8} {:>8} {:>9} {:>9} {:>9}",
            row.segment, row.capacity, row.forward, row.backward, row.total()
        );
    }
    println!();

    println!("{:<9} {:>11} {:>12} {:>13} {:>8}", "Shoulder", "Max queue", "Max wait ms", "Mean wait ms", "Served");
    println!("{}", "-".repeat(57));
    for row in &report.shoulders {
        println!(
            "{:<9} {:>11} {:>12.1} {:>13.1} {:>8}",
            row.shoulder, row.max_waiting, row.max_wait_ms, row.mean_wait_ms, row.served
        );
    }
    println!();

    // 4. CSV export.
    let mut writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    writer.write_report(&report)?;
    info!(dir = OUTPUT_DIR, "report written");
    println!("CSV written to {OUTPUT_DIR}/");

    Ok(())
}
