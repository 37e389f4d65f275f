//! Ark engine binary for the Simulated Ark.
//!
//! Loads configuration, seeds the shared generator, runs the cycle loop over
//! every simulation layer and exports the recorded history.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line flags
//! 2. Load configuration from `ark-config.yaml` (defaults when missing)
//! 3. Initialize structured logging (tracing)
//! 4. Resolve the seed and build the Ark (probe, registry, seed layer)
//! 5. Run the cycle loop
//! 6. Log the result and export the history

mod error;
mod export;
mod observer;

use std::path::{Path, PathBuf};

use ark_core::config::ArkConfig;
use ark_core::history::RunHistory;
use ark_core::runner::{self, Ark};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer::LoggingObserver;

#[derive(Parser)]
#[command(
    name = "ark-engine",
    about = "Nested simulation layers collapsing under their own climate"
)]
struct Cli {
    /// Path of the YAML configuration file
    #[arg(long, default_value = "ark-config.yaml")]
    config: PathBuf,

    /// Seed of the shared random generator (overrides `world.seed`)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of cycles to run (overrides `cycles.max_cycles`)
    #[arg(long)]
    cycles: Option<u64>,

    /// Output directory for the history export (overrides `output.dir`)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Application entry point for the Ark engine.
///
/// # Errors
///
/// Returns an error if configuration, the run or the export fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Parse flags.
    let cli = Cli::parse();

    // 2. Load configuration.
    let config = load_config(&cli)?;

    // 3. Initialize structured logging.
    init_logging(&config);
    info!("ark-engine starting");
    info!(
        world_name = config.world.name,
        max_cycles = config.cycles.max_cycles,
        cycle_interval_ms = config.cycles.cycle_interval_ms,
        capacity = config.layers.capacity,
        collapsed_layers = ?config.layers.collapsed_layers,
        spawn_policy = ?config.layers.spawn_policy,
        "Configuration loaded"
    );

    // 4. Build the Ark.
    let seed = config.world.seed.unwrap_or_else(rand::random);
    info!(seed, explicit = config.world.seed.is_some(), "Seed resolved");
    let mut ark = Ark::from_config(&config, seed).map_err(EngineError::from)?;

    // 5. Run.
    let mut observer = LoggingObserver::default();
    let outcome = ark
        .run(config.cycles.max_cycles, &mut observer)
        .map_err(EngineError::from)?;

    // 6. Log and export.
    runner::log_run_end(&outcome);
    info!(spawned_total = observer.spawned_total(), "Layer tree complete");

    if config.output.export_history {
        let history = RunHistory::capture(&ark);
        let path = export::write_history(&config.output.dir, &history)?;
        info!(path = %path.display(), "Run history exported");
    }

    info!(run_id = %ark.run_id(), "ark-engine shutdown complete");
    Ok(())
}

/// Load the configuration named on the command line and apply flag
/// overrides.
///
/// A missing file yields the defaults.
fn load_config(cli: &Cli) -> Result<ArkConfig, EngineError> {
    let mut config = read_config(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.world.seed = Some(seed);
    }
    if let Some(cycles) = cli.cycles {
        config.cycles.max_cycles = cycles;
    }
    if let Some(ref output) = cli.output {
        config.output.dir.clone_from(output);
    }
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ArkConfig, EngineError> {
    if path.exists() {
        Ok(ArkConfig::from_file(path)?)
    } else {
        Ok(ArkConfig::default())
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &ArkConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
