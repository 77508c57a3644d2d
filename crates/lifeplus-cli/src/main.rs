//! `lifeplus` runs a headless multi-species automaton session.
//!
//! ```text
//! lifeplus [--config <path>] [--generations <n>] [--seed <digits>]
//!          [--engine classic|directional] [--exclusive-cell] [--end-on-top]
//!          [--log-format pretty|json] [--print-grid]
//! ```

mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lifeplus_core::{format_species_mask, EngineKind, SimulationConfig};
use lifeplus_engine::{parse_seed, Simulation};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineArg {
    Classic,
    Directional,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Classic => EngineKind::Classic,
            EngineArg::Directional => EngineKind::Directional,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Run a multi-species cellular automaton session.
#[derive(Parser)]
#[command(name = "lifeplus", version, about = "Run a multi-species cellular automaton session")]
struct Args {
    /// JSON session configuration. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to run.
    #[arg(long)]
    generations: Option<u64>,

    /// Decimal seed in 0..=4294967295. Anything else is ignored.
    #[arg(long)]
    seed: Option<String>,

    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// Allow at most one species per cell.
    #[arg(long)]
    exclusive_cell: bool,

    /// End the session when any species reaches the top row.
    #[arg(long)]
    end_on_top: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Print the final grid, top row first.
    #[arg(long)]
    print_grid: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(matches!(args.log_format, LogFormat::Json))?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let mut sim = Simulation::new(&config).context("failed to create simulation")?;
    info!(seed = sim.seed(), generations = config.generations, "Starting lifeplus");

    let summary = sim.run(config.generations)?;

    println!("seed:        {}", summary.seed);
    println!("generations: {}", summary.generation);
    println!(
        "population:  A={} B={} C={}",
        summary.population[0], summary.population[1], summary.population[2]
    );
    match summary.game_over {
        Some(mask) => println!("game over:   {} reached the top", format_species_mask(mask)),
        None => println!("game over:   no"),
    }
    if args.print_grid {
        println!();
        print!("{}", sim.grid());
    }

    Ok(())
}

fn apply_overrides(config: &mut SimulationConfig, args: &Args) {
    if let Some(generations) = args.generations {
        config.generations = generations;
    }
    if let Some(text) = &args.seed {
        match parse_seed(text) {
            Some(seed) => config.seed = Some(seed),
            None => warn!(seed = %text, "Ignoring invalid seed"),
        }
    }
    if let Some(engine) = args.engine {
        config.engine = engine.into();
    }
    if args.exclusive_cell {
        config.meta_rules.exclusive_cell = true;
    }
    if args.end_on_top {
        config.meta_rules.end_on_top = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "lifeplus",
            "--generations",
            "12",
            "--seed",
            "77",
            "--engine",
            "classic",
            "--exclusive-cell",
        ]);
        let mut config = SimulationConfig::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.generations, 12);
        assert_eq!(config.seed, Some(77));
        assert_eq!(config.engine, EngineKind::Classic);
        assert!(config.meta_rules.exclusive_cell);
        assert!(!config.meta_rules.end_on_top);
    }

    #[test]
    fn test_invalid_seed_keeps_config_seed() {
        let args = Args::parse_from(["lifeplus", "--seed", "12ab"]);
        let mut config = SimulationConfig {
            seed: Some(5),
            ..SimulationConfig::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.seed, Some(5));
    }
}
