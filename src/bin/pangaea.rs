//! CLI driver: generate a world, run the civilization simulation for a
//! number of years, and optionally write a save file.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pangaea::aggregate::{save, Simulation, Speed};
use pangaea::Result;

#[derive(Parser, Debug)]
#[command(name = "pangaea", about = "Deterministic planet and civilization simulator")]
struct Cli {
    /// World seed. Any u32; the same seed always reproduces the same world
    /// and the same civilization history.
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Number of years to simulate.
    #[arg(long, default_value_t = 500)]
    years: u32,

    /// Playback speed label, purely informational for this CLI (a
    /// real-time driver would use it to throttle ticks).
    #[arg(long, value_enum, default_value_t = SpeedArg::Speed4)]
    speed: SpeedArg,

    /// Write a save file to this path after the run completes.
    #[arg(long)]
    out: Option<String>,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum SpeedArg {
    Paused,
    Speed1,
    Speed2,
    Speed3,
    Speed4,
}

impl From<SpeedArg> for Speed {
    fn from(s: SpeedArg) -> Self {
        match s {
            SpeedArg::Paused => Speed::Paused,
            SpeedArg::Speed1 => Speed::Speed1,
            SpeedArg::Speed2 => Speed::Speed2,
            SpeedArg::Speed3 => Speed::Speed3,
            SpeedArg::Speed4 => Speed::Speed4,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let mut sim = Simulation::new(cli.seed);
    sim.set_speed(cli.speed.into());
    sim.initialize()?;

    tracing::info!(seed = cli.seed, tribes = sim.tribes.len(), "world initialized");

    for _ in 0..cli.years {
        sim.tick();
    }

    let state = sim.get_state();
    tracing::info!(
        year = state.year,
        tribes = state.tribe_count,
        countries = state.country_count,
        wars = state.war_count,
        population = state.total_population,
        tech_level = state.tech_level,
        "simulation complete"
    );

    for event in sim.events.surface().iter().rev().take(20) {
        println!("[{}] {:?}: {}", event.year, event.kind, event.message);
    }

    if let Some(path) = cli.out {
        let now_ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
        let file = save(&sim, now_ms);
        fs::write(&path, serde_json::to_vec_pretty(&file)?)?;
        tracing::info!(path, "save written");
    }

    Ok(())
}
