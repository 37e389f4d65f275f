//! The Ark controller: the cycle loop over every layer.
//!
//! [`Ark::run`] drives a bounded run of [`Ark::run_cycle`]. One cycle:
//!
//! 1. Count the cycle and snapshot the layer ids that exist right now.
//! 2. Step every snapshotted layer in creation order. Collapsed layers are
//!    skipped when the configuration freezes them.
//! 3. For every collapse report, ask the registry for a child of the
//!    collapsing layer as the spawn policy dictates. A full registry is
//!    logged and ignored.
//! 4. Let the probe listen for a signal from galactic depths.
//!
//! Children spawned in step 3 are not in the snapshot, so they first step in
//! the following cycle.

use ark_types::{LayerId, RunId};
use ark_world::{CollapseLimits, ContentError, ContentProvider, Entropy, StoryContent};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::{ArkConfig, CollapsedLayerPolicy, SpawnPolicy};
use crate::layer::{StepParams, StepReport};
use crate::probe::Probe;
use crate::registry::{LayerRegistry, RegistryError};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The content provider could not supply an entry.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: ContentError,
    },

    /// The registry rejected an operation for a reason other than capacity.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

/// Per-run behavior of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    /// Probabilities every layer step draws against.
    pub step: StepParams,
    /// Chance per cycle that the probe detects a signal.
    pub signal_probability: f64,
    /// Whether collapsed layers keep stepping.
    pub collapsed_layers: CollapsedLayerPolicy,
    /// When collapsed layers request children.
    pub spawn_policy: SpawnPolicy,
    /// Real-time pause between cycles, in milliseconds.
    pub cycle_interval_ms: u64,
}

impl RunSettings {
    /// Extract the controller settings from a loaded configuration.
    pub const fn from_config(config: &ArkConfig) -> Self {
        Self {
            step: StepParams {
                anomaly_probability: config.events.anomaly_probability,
                dialogue_probability: config.events.dialogue_probability,
            },
            signal_probability: config.events.signal_probability,
            collapsed_layers: config.layers.collapsed_layers,
            spawn_policy: config.layers.spawn_policy,
            cycle_interval_ms: config.cycles.cycle_interval_ms,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&ArkConfig::default())
    }
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    /// Cycle number, from 1.
    pub cycle: u64,
    /// One report per layer that stepped, in creation order.
    pub reports: Vec<StepReport>,
    /// Layers skipped because they were frozen.
    pub frozen: Vec<LayerId>,
    /// Layers spawned this cycle.
    pub spawned: Vec<LayerId>,
    /// Spawn requests refused because the registry was full.
    pub rejected_spawns: u32,
    /// The signal the probe detected this cycle, if any.
    pub signal: Option<String>,
    /// Number of layers at the end of the cycle.
    pub layer_count: usize,
}

/// Final figures of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArkOutcome {
    /// Cycles executed.
    pub cycles_run: u64,
    /// Layers that exist at the end.
    pub layer_count: usize,
    /// Philosophical dialogues spoken across all layers.
    pub dialogue_count: u64,
    /// Signals the probe detected.
    pub signals: usize,
    /// Quantum stability of the probe at the end.
    pub quantum_stability: f64,
}

/// Callback invoked after each cycle completes.
pub trait CycleObserver {
    /// Called after a cycle completes successfully.
    fn on_cycle(&mut self, summary: &CycleSummary, registry: &LayerRegistry);
}

/// A no-op cycle observer for testing.
pub struct NoOpObserver;

impl CycleObserver for NoOpObserver {
    fn on_cycle(&mut self, _summary: &CycleSummary, _registry: &LayerRegistry) {}
}

/// The controller owning the probe, the layers and the shared generator.
pub struct Ark {
    registry: LayerRegistry,
    probe: Probe,
    content: Box<dyn ContentProvider>,
    rng: Box<dyn Entropy>,
    settings: RunSettings,
    dialogue_count: u64,
    run_id: RunId,
    seed: Option<u64>,
    started_at: DateTime<Utc>,
}

impl Ark {
    /// Assemble the probe, size the registry and create the seed layer.
    ///
    /// `capacity` pins the layer ceiling; `None` lets the probe's quantum
    /// cores decide. The probe is assembled from `rng` either way, so a
    /// pinned capacity does not change the draws that follow.
    pub fn new(
        settings: RunSettings,
        capacity: Option<u32>,
        limits: CollapseLimits,
        content: Box<dyn ContentProvider>,
        mut rng: Box<dyn Entropy>,
    ) -> Result<Self, RunnerError> {
        let probe = Probe::assemble(&mut *rng);
        let capacity = capacity.unwrap_or_else(|| probe.simulation_capacity());
        let mut registry = LayerRegistry::new(capacity, limits);
        registry.seed()?;

        Ok(Self {
            registry,
            probe,
            content,
            rng,
            settings,
            dialogue_count: 0,
            run_id: RunId::new(),
            seed: None,
            started_at: Utc::now(),
        })
    }

    /// Build a controller from configuration, the stock content and a
    /// generator seeded with `seed`.
    pub fn from_config(config: &ArkConfig, seed: u64) -> Result<Self, RunnerError> {
        let limits = CollapseLimits {
            co2_ppm: config.layers.collapse_threshold,
            temperature: config.layers.temperature_limit,
        };
        let mut ark = Self::new(
            RunSettings::from_config(config),
            config.layers.capacity,
            limits,
            Box::new(StoryContent::builtin()),
            Box::new(StdRng::seed_from_u64(seed)),
        )?;
        ark.seed = Some(seed);
        info!(
            world = %config.world.name,
            run_id = %ark.run_id,
            seed,
            capacity = ark.registry.capacity(),
            "Ark initialized"
        );
        Ok(ark)
    }

    /// Run one cycle over every layer that exists when it starts.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Content`] if a content pool is empty, or
    /// [`RunnerError::Registry`] for a registry failure other than
    /// exhausted capacity.
    pub fn run_cycle(&mut self) -> Result<CycleSummary, RunnerError> {
        let cycle = self.registry.begin_cycle();
        let snapshot = self.registry.ids();

        let mut reports = Vec::with_capacity(snapshot.len());
        let mut frozen = Vec::new();
        for id in snapshot {
            let Some(layer) = self.registry.get_mut(id) else {
                continue;
            };
            if self.settings.collapsed_layers == CollapsedLayerPolicy::Freeze
                && layer.is_collapsing()
            {
                frozen.push(id);
                continue;
            }
            let report = layer.step(self.settings.step, &*self.content, &mut *self.rng)?;
            if let Some(ref line) = report.dialogue {
                self.dialogue_count = self.dialogue_count.saturating_add(1);
                info!(layer = %id, dialogue_count = self.dialogue_count, line = %line, "Dialogue");
            }
            reports.push(report);
        }

        let mut spawned = Vec::new();
        let mut rejected_spawns = 0_u32;
        for report in &reports {
            let wants_child = match self.settings.spawn_policy {
                SpawnPolicy::EveryCycle => report.collapsing,
                SpawnPolicy::OnTransition => report.newly_collapsed,
            };
            if !wants_child {
                continue;
            }
            match self.registry.spawn_child(report.layer) {
                Ok(child) => spawned.push(child),
                Err(RegistryError::CapacityExceeded { capacity }) => {
                    rejected_spawns = rejected_spawns.saturating_add(1);
                    warn!(
                        layer = %report.layer,
                        capacity,
                        "Maximum simulation capacity reached"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        let signal = if self.rng.chance(self.settings.signal_probability) {
            Some(self.probe.detect_signal(&*self.content, &mut *self.rng)?)
        } else {
            None
        };

        Ok(CycleSummary {
            cycle,
            reports,
            frozen,
            spawned,
            rejected_spawns,
            signal,
            layer_count: self.registry.len(),
        })
    }

    /// Run `max_cycles` cycles, notifying `observer` after each.
    ///
    /// # Errors
    ///
    /// Returns the first [`RunnerError`] a cycle produces.
    pub fn run(
        &mut self,
        max_cycles: u64,
        observer: &mut dyn CycleObserver,
    ) -> Result<ArkOutcome, RunnerError> {
        info!(
            run_id = %self.run_id,
            max_cycles,
            cycle_interval_ms = self.settings.cycle_interval_ms,
            capacity = self.registry.capacity(),
            "Simulation starting"
        );

        for remaining in (0..max_cycles).rev() {
            let summary = self.run_cycle()?;
            observer.on_cycle(&summary, &self.registry);

            if remaining > 0 && self.settings.cycle_interval_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(
                    self.settings.cycle_interval_ms,
                ));
            }
        }

        Ok(self.outcome())
    }

    /// Figures of the run so far.
    pub fn outcome(&self) -> ArkOutcome {
        ArkOutcome {
            cycles_run: self.registry.cycle_count(),
            layer_count: self.registry.len(),
            dialogue_count: self.dialogue_count,
            signals: self.probe.detected_signals().len(),
            quantum_stability: self.probe.quantum_stability(),
        }
    }

    /// Every layer of the run.
    pub const fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// The probe hosting the layers.
    pub const fn probe(&self) -> &Probe {
        &self.probe
    }

    /// Controller settings.
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Dialogues spoken so far.
    pub const fn dialogue_count(&self) -> u64 {
        self.dialogue_count
    }

    /// Identifier of this run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Seed of the shared generator, when built from configuration.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// When the controller was created.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Log the end of a run.
pub fn log_run_end(outcome: &ArkOutcome) {
    info!(
        cycles_run = outcome.cycles_run,
        layer_count = outcome.layer_count,
        dialogue_count = outcome.dialogue_count,
        signals = outcome.signals,
        quantum_stability = outcome.quantum_stability,
        "Simulation ended"
    );
    if outcome.cycles_run == 0 {
        warn!("Simulation ended with no cycles executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use ark_world::FixedEntropy;

    use super::*;

    /// An Ark whose draws are all midpoints and whose rolls skip every
    /// optional event, so layers only evolve their climate.
    fn quiet_ark(settings: RunSettings, capacity: u32) -> Ark {
        Ark::new(
            settings,
            Some(capacity),
            CollapseLimits::default(),
            Box::new(StoryContent::builtin()),
            Box::new(FixedEntropy::with_roll(0.99)),
        )
        .unwrap()
    }

    #[test]
    fn first_collapse_spawns_layer_two_after_the_step() {
        let mut ark = quiet_ark(RunSettings::default(), 10);
        for _ in 0..20 {
            let summary = ark.run_cycle().unwrap();
            assert!(summary.spawned.is_empty());
        }
        let summary = ark.run_cycle().unwrap();
        assert_eq!(summary.cycle, 21);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.spawned, vec![LayerId(2)]);

        let child = ark.registry().get(LayerId(2)).unwrap();
        assert_eq!(child.parent(), Some(LayerId(1)));
        assert_eq!(child.climate().history().len(), 1);
    }

    #[test]
    fn children_are_stepped_from_the_next_cycle() {
        let mut ark = quiet_ark(RunSettings::default(), 10);
        for _ in 0..21 {
            ark.run_cycle().unwrap();
        }
        let summary = ark.run_cycle().unwrap();
        let stepped: Vec<LayerId> = summary.reports.iter().map(|r| r.layer).collect();
        assert_eq!(stepped, vec![LayerId(1), LayerId(2)]);
        // Layer 1 is still collapsing and asks again.
        assert_eq!(summary.spawned, vec![LayerId(3)]);
    }

    #[test]
    fn on_transition_spawns_once_per_collapse() {
        let settings = RunSettings {
            spawn_policy: SpawnPolicy::OnTransition,
            ..RunSettings::default()
        };
        let mut ark = quiet_ark(settings, 10);
        let mut spawned = Vec::new();
        for _ in 0..30 {
            spawned.extend(ark.run_cycle().unwrap().spawned);
        }
        assert_eq!(spawned, vec![LayerId(2)]);
    }

    #[test]
    fn frozen_layers_stop_stepping() {
        let settings = RunSettings {
            collapsed_layers: CollapsedLayerPolicy::Freeze,
            ..RunSettings::default()
        };
        let mut ark = quiet_ark(settings, 10);
        for _ in 0..21 {
            ark.run_cycle().unwrap();
        }
        let summary = ark.run_cycle().unwrap();
        assert_eq!(summary.frozen, vec![LayerId(1)]);
        let stepped: Vec<LayerId> = summary.reports.iter().map(|r| r.layer).collect();
        assert_eq!(stepped, vec![LayerId(2)]);
        assert_eq!(ark.registry().get(LayerId(1)).unwrap().climate().history().len(), 22);
    }

    #[test]
    fn capacity_of_one_logs_and_continues() {
        let mut ark = quiet_ark(RunSettings::default(), 1);
        let outcome = ark.run(30, &mut NoOpObserver).unwrap();
        assert_eq!(outcome.cycles_run, 30);
        assert_eq!(outcome.layer_count, 1);
    }

    #[test]
    fn observer_sees_every_cycle() {
        struct CountObserver {
            count: u64,
        }
        impl CycleObserver for CountObserver {
            fn on_cycle(&mut self, _summary: &CycleSummary, _registry: &LayerRegistry) {
                self.count = self.count.saturating_add(1);
            }
        }

        let mut ark = quiet_ark(RunSettings::default(), 3);
        let mut observer = CountObserver { count: 0 };
        ark.run(5, &mut observer).unwrap();
        assert_eq!(observer.count, 5);
    }

    #[test]
    fn certain_signals_erode_stability() {
        let settings = RunSettings {
            signal_probability: 1.0,
            ..RunSettings::default()
        };
        let mut ark = quiet_ark(settings, 3);
        let outcome = ark.run(4, &mut NoOpObserver).unwrap();
        assert_eq!(outcome.signals, 4);
        assert!(outcome.quantum_stability < 1.0);
    }

    #[test]
    fn derived_capacity_comes_from_the_probe() {
        let ark = Ark::new(
            RunSettings::default(),
            None,
            CollapseLimits::default(),
            Box::new(StoryContent::builtin()),
            Box::new(FixedEntropy::midpoint()),
        )
        .unwrap();
        assert_eq!(ark.registry().capacity(), ark.probe().simulation_capacity());
        assert_eq!(ark.registry().len(), 1);
    }

    #[test]
    fn config_events_and_policies_reach_the_settings() {
        let config = ArkConfig::parse(
            "events:\n  signal_probability: 0.5\n  anomaly_probability: 0.1\n\
             layers:\n  capacity: 3\n  collapsed_layers: freeze\n  spawn_policy: on_transition\n",
        )
        .unwrap();
        let ark = Ark::from_config(&config, 4).unwrap();
        let settings = ark.settings();
        assert_eq!(settings.signal_probability, 0.5);
        assert_eq!(settings.step.anomaly_probability, 0.1);
        assert_eq!(settings.step.dialogue_probability, 0.3);
        assert_eq!(settings.collapsed_layers, CollapsedLayerPolicy::Freeze);
        assert_eq!(settings.spawn_policy, SpawnPolicy::OnTransition);
        assert_eq!(ark.seed(), Some(4));
    }
}
