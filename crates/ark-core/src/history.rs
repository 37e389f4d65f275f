//! The recorded history of a run, handed to visualization consumers.
//!
//! [`RunHistory::capture`] takes a read-only look at a finished (or running)
//! [`Ark`] and copies out everything a chart or a layer-tree drawing needs.
//! Nothing here feeds back into the simulation.

use std::collections::BTreeMap;

use ark_agents::ConsciousnessEntity;
use ark_types::{AnomalyRecord, ClimateState, LayerId, LayerStatus, RunId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::layer::SimulationLayer;
use crate::probe::QuantumCore;
use crate::runner::Ark;

/// Signal texts longer than this are truncated in the histogram.
pub const SIGNAL_LABEL_CHARS: usize = 30;

/// What one inhabitant became by capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    /// Entity name.
    pub name: String,
    /// Narrative role.
    pub role: String,
    /// Awareness in `[0.0, 1.0]`.
    pub awareness_level: f64,
    /// Whether the entity has awakened.
    pub is_aware: bool,
    /// Memories the entity carried in.
    pub memories: Vec<String>,
    /// Dreams seen at awakening, oldest first.
    pub dreams: Vec<String>,
    /// Memories planted by glitches, oldest first.
    pub glitch_memories: Vec<String>,
}

impl EntityRecord {
    /// Copy the recorded state of `entity`.
    pub fn from_entity(entity: &ConsciousnessEntity) -> Self {
        Self {
            name: entity.name().to_owned(),
            role: entity.role().to_owned(),
            awareness_level: entity.awareness_level(),
            is_aware: entity.is_aware(),
            memories: entity.memories().to_vec(),
            dreams: entity.dreams().to_vec(),
            glitch_memories: entity.glitch_memories().to_vec(),
        }
    }
}

/// Everything recorded about one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerRecord {
    /// Layer identifier.
    pub id: LayerId,
    /// The layer whose collapse spawned this one.
    pub parent: Option<LayerId>,
    /// Generation counter. The seed layer is 0.
    pub depth: u32,
    /// Status at capture time.
    pub status: LayerStatus,
    /// Climate at capture time.
    pub climate: ClimateState,
    /// Layer calendar year at capture time. Differs from the climate year
    /// once a year-reset glitch has struck.
    pub calendar_year: u32,
    /// Year of every climate sample, strictly increasing.
    pub years: Vec<u32>,
    /// CO2 of every climate sample.
    pub co2_ppm: Vec<f64>,
    /// Temperature of every climate sample.
    pub temperature: Vec<f64>,
    /// Anomalies observed, oldest first.
    pub anomalies: Vec<AnomalyRecord>,
    /// Number of glitches that struck.
    pub glitch_count: usize,
    /// Number of inhabitants.
    pub entity_count: usize,
    /// Number of inhabitants that awakened.
    pub aware_count: usize,
    /// Every inhabitant, in insertion order.
    pub entities: Vec<EntityRecord>,
}

impl LayerRecord {
    /// Copy the recorded state of `layer`.
    pub fn from_layer(layer: &SimulationLayer) -> Self {
        let history = layer.climate().history();
        Self {
            id: layer.id(),
            parent: layer.parent(),
            depth: layer.depth(),
            status: layer.status(),
            climate: layer.climate_state().clone(),
            calendar_year: layer.year(),
            years: history.years().to_vec(),
            co2_ppm: history.co2_ppm().to_vec(),
            temperature: history.temperature().to_vec(),
            anomalies: layer.anomalies().to_vec(),
            glitch_count: layer.glitches().len(),
            entity_count: layer.entities().len(),
            aware_count: layer.aware_count(),
            entities: layer.entities().iter().map(EntityRecord::from_entity).collect(),
        }
    }
}

/// The full record of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunHistory {
    /// Identifier of the run.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Seed of the shared generator, when known.
    pub seed: Option<u64>,
    /// Cycles executed.
    pub cycles: u64,
    /// Layer ceiling of the run.
    pub capacity: u32,
    /// Every layer, in creation order.
    pub layers: Vec<LayerRecord>,
    /// The probe's quantum cores.
    pub quantum_cores: Vec<QuantumCore>,
    /// How often each (truncated) signal was detected.
    pub signal_histogram: BTreeMap<String, u32>,
    /// Philosophical dialogues spoken.
    pub dialogue_count: u64,
    /// Quantum stability of the probe at capture time.
    pub quantum_stability: f64,
}

impl RunHistory {
    /// Copy the recorded history out of `ark`.
    pub fn capture(ark: &Ark) -> Self {
        let registry = ark.registry();
        let probe = ark.probe();
        Self {
            run_id: ark.run_id(),
            started_at: ark.started_at(),
            seed: ark.seed(),
            cycles: registry.cycle_count(),
            capacity: registry.capacity(),
            layers: registry.layers().iter().map(LayerRecord::from_layer).collect(),
            quantum_cores: probe.cores().to_vec(),
            signal_histogram: signal_histogram(probe.detected_signals()),
            dialogue_count: ark.dialogue_count(),
            quantum_stability: probe.quantum_stability(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Count signals by label. Labels longer than [`SIGNAL_LABEL_CHARS`]
/// characters are cut there and suffixed with `...`.
pub fn signal_histogram(signals: &[String]) -> BTreeMap<String, u32> {
    let mut histogram = BTreeMap::new();
    for signal in signals {
        let count = histogram.entry(signal_label(signal)).or_insert(0_u32);
        *count = count.saturating_add(1);
    }
    histogram
}

fn signal_label(signal: &str) -> String {
    if signal.chars().count() > SIGNAL_LABEL_CHARS {
        let mut label: String = signal.chars().take(SIGNAL_LABEL_CHARS).collect();
        label.push_str("...");
        label
    } else {
        signal.to_owned()
    }
}
