#![warn(clippy::unwrap_used, clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::doc_markdown
)]
use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use itertools::Itertools;
use orrery::{
    bodies::SolarSystem,
    engine::{PositionEngine, PositionSnapshot},
};
use ron::ser::PrettyConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Headless driver for the orrery position engine.
///
/// Loads a RON system description, ticks the engine across a range of
/// simulated instants, and prints each snapshot.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the RON system description.
    #[arg(long, default_value = "systems/sol.ron")]
    system: PathBuf,
    /// Simulated time of the first snapshot (`sec`).
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// Number of snapshots to take.
    #[arg(long, default_value_t = 1)]
    ticks: u32,
    /// Simulated time between snapshots (`sec`).
    #[arg(long, default_value_t = 3600.0)]
    step: f64,
    /// Print snapshots as RON instead of a table.
    #[arg(long)]
    ron: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let system: SolarSystem = ron::from_str(&fs::read_to_string(&args.system)?)?;
    info!(
        "loaded {}: {} bodies, {} derived nodes",
        args.system.display(),
        system.bodies.len(),
        system.derived.len()
    );
    let engine = PositionEngine::new(system)?;

    for tick in 0..args.ticks {
        let sim_time_s = args.time + f64::from(tick) * args.step;
        let snapshot = engine.compute_positions(sim_time_s)?;
        if args.ron {
            println!(
                "{}",
                ron::ser::to_string_pretty(&snapshot, PrettyConfig::default())?
            );
        } else {
            print_snapshot(sim_time_s, &snapshot);
        }
    }
    Ok(())
}

fn print_snapshot(sim_time_s: f64, snapshot: &PositionSnapshot) {
    println!("t = {sim_time_s} s (km_to_px = {})", snapshot.km_to_px);
    for (name, pos) in snapshot
        .positions
        .iter()
        .sorted_by_key(|&(name, _)| name.clone())
    {
        println!("  {name:<16} x = {:>15.3} km   y = {:>15.3} km", pos.x, pos.y);
    }
    for (name, ring) in snapshot.rings.iter().sorted_by_key(|&(name, _)| name.clone()) {
        println!(
            "  {name:<16} ring \"{}\" r = {:.1} km around ({:.1}, {:.1})",
            ring.label, ring.radius_km, ring.center.x, ring.center.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_system_loads_and_resolves() -> eyre::Result<()> {
        let system: SolarSystem = ron::from_str(include_str!("../systems/sol.ron"))?;
        let engine = PositionEngine::new(system)?;
        let snapshot = engine.compute_positions(86_400.0)?;
        for name in ["Sun", "Earth", "Moon", "EML1", "EML2", "EML4", "EML5"] {
            assert!(snapshot.positions.contains_key(name), "missing {name}");
        }
        assert!(snapshot.rings.contains_key("GEO Ring"));
        Ok(())
    }
}
