//! Configuration loading and typed config structures for the Simulated Ark.
//!
//! The configuration lives in `ark-config.yaml` next to the binary's working
//! directory. Every field has a default matching the stock story, so an
//! absent file or an empty document yields a complete configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but lies outside its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArkConfig {
    /// Run identity and seeding.
    #[serde(default)]
    pub world: WorldConfig,

    /// Cycle budget and pacing.
    #[serde(default)]
    pub cycles: CycleConfig,

    /// Layer capacity and collapse behavior.
    #[serde(default)]
    pub layers: LayerConfig,

    /// Event probabilities.
    #[serde(default)]
    pub events: EventConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the run history is written.
    #[serde(default)]
    pub output: OutputConfig,
}

impl ArkConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycles.max_cycles == 0 {
            return Err(invalid("cycles.max_cycles must be at least 1"));
        }
        if self.layers.capacity == Some(0) {
            return Err(invalid("layers.capacity must be at least 1 when set"));
        }
        for (name, value) in [
            ("events.anomaly_probability", self.events.anomaly_probability),
            ("events.dialogue_probability", self.events.dialogue_probability),
            ("events.signal_probability", self.events.signal_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must lie in [0, 1], got {value}"),
                });
            }
        }
        if !self.layers.collapse_threshold.is_finite() || !self.layers.temperature_limit.is_finite()
        {
            return Err(invalid("layers collapse limits must be finite"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Run identity and seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable name of the run.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed of the shared random generator. Absent means a fresh random seed
    /// that is logged at startup.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
        }
    }
}

/// Cycle budget and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CycleConfig {
    /// Number of cycles a run executes.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,

    /// Real-time pause between cycles, in milliseconds.
    #[serde(default)]
    pub cycle_interval_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            cycle_interval_ms: 0,
        }
    }
}

/// Whether a collapsed layer keeps evolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsedLayerPolicy {
    /// Collapsed layers keep stepping every cycle.
    #[default]
    Evolve,
    /// Collapsed layers stop stepping after the cycle they collapsed in.
    Freeze,
}

/// When a collapsed layer asks for a child layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Every cycle the layer steps while collapsed.
    #[default]
    EveryCycle,
    /// Only in the cycle the collapse latch is set.
    OnTransition,
}

/// Layer capacity and collapse behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerConfig {
    /// Fixed layer ceiling. Absent means the probe's quantum cores decide.
    #[serde(default)]
    pub capacity: Option<u32>,

    /// CO2 level above which a layer collapses, in ppm.
    #[serde(default = "default_collapse_threshold")]
    pub collapse_threshold: f64,

    /// Temperature above which a layer collapses, in degrees Celsius.
    #[serde(default = "default_temperature_limit")]
    pub temperature_limit: f64,

    /// Whether collapsed layers keep evolving.
    #[serde(default)]
    pub collapsed_layers: CollapsedLayerPolicy,

    /// When collapsed layers request children.
    #[serde(default)]
    pub spawn_policy: SpawnPolicy,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            collapse_threshold: default_collapse_threshold(),
            temperature_limit: default_temperature_limit(),
            collapsed_layers: CollapsedLayerPolicy::default(),
            spawn_policy: SpawnPolicy::default(),
        }
    }
}

/// Event probabilities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventConfig {
    /// Chance per layer per cycle of an anomaly.
    #[serde(default = "default_anomaly_probability")]
    pub anomaly_probability: f64,

    /// Chance per layer per cycle of a philosophical dialogue.
    #[serde(default = "default_dialogue_probability")]
    pub dialogue_probability: f64,

    /// Chance per cycle that the probe detects an external signal.
    #[serde(default = "default_signal_probability")]
    pub signal_probability: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            anomaly_probability: default_anomaly_probability(),
            dialogue_probability: default_dialogue_probability(),
            signal_probability: default_signal_probability(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Where the run history is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created when missing.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Whether to write `ark-history.json` after the run.
    #[serde(default = "default_true")]
    pub export_history: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            export_history: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Simulated Ark".to_owned()
}

const fn default_max_cycles() -> u64 {
    30
}

const fn default_collapse_threshold() -> f64 {
    ark_world::climate::DEFAULT_COLLAPSE_CO2_PPM
}

const fn default_temperature_limit() -> f64 {
    ark_world::climate::DEFAULT_COLLAPSE_TEMPERATURE
}

const fn default_anomaly_probability() -> f64 {
    0.4
}

const fn default_dialogue_probability() -> f64 {
    0.3
}

const fn default_signal_probability() -> f64 {
    0.25
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ark-output")
}

const fn default_true() -> bool {
    true
}
