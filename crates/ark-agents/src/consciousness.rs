//! Consciousness entities and their awakening.
//!
//! An entity lives in exactly one layer. Anomalies observed by its layer push
//! it toward self-awareness: once more than [`AWAKENING_ANOMALY_THRESHOLD`]
//! anomalies have been seen, every check draws a roll against
//! `0.3 + anomalies * 0.1`.
//!
//! The probability is deliberately left uncapped. From seven anomalies on it
//! exceeds 1.0, so every check succeeds and awareness climbs by
//! [`AWARENESS_GAIN`] per cycle until it saturates at 1.0.

use ark_types::ContentCategory;
use ark_world::{ContentError, ContentProvider, Entropy};
use tracing::debug;

/// Anomaly count an entity must exceed before it can awaken.
pub const AWAKENING_ANOMALY_THRESHOLD: usize = 3;

/// Awakening probability before any anomaly bonus.
pub const AWAKENING_BASE_PROBABILITY: f64 = 0.3;

/// Awakening probability added per observed anomaly.
pub const AWAKENING_PER_ANOMALY: f64 = 0.1;

/// Awareness gained on every successful awakening.
pub const AWARENESS_GAIN: f64 = 0.3;

/// Upper bound of awareness.
pub const MAX_AWARENESS: f64 = 1.0;

/// Probability that an entity awakens after `anomaly_count` anomalies.
///
/// Zero at or below the threshold, otherwise `0.3 + count * 0.1` with no
/// upper clamp.
pub fn awakening_probability(anomaly_count: usize) -> f64 {
    if anomaly_count <= AWAKENING_ANOMALY_THRESHOLD {
        return 0.0;
    }
    let count = f64::from(u32::try_from(anomaly_count).unwrap_or(u32::MAX));
    AWAKENING_BASE_PROBABILITY + count * AWAKENING_PER_ANOMALY
}

/// A narrative agent living inside a simulation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsciousnessEntity {
    name: String,
    role: String,
    awareness_level: f64,
    is_aware: bool,
    memories: Vec<String>,
    dreams: Vec<String>,
    glitch_memories: Vec<String>,
}

impl ConsciousnessEntity {
    /// A fresh, unaware entity with no memories.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            awareness_level: 0.0,
            is_aware: false,
            memories: Vec::new(),
            dreams: Vec::new(),
            glitch_memories: Vec::new(),
        }
    }

    /// Replace the entity's memories.
    #[must_use]
    pub fn with_memories(mut self, memories: &[&str]) -> Self {
        self.memories = memories.iter().map(|&m| m.to_owned()).collect();
        self
    }

    /// Replace the entity's dreams.
    #[must_use]
    pub fn with_dreams(mut self, dreams: &[&str]) -> Self {
        self.dreams = dreams.iter().map(|&d| d.to_owned()).collect();
        self
    }

    /// Mark the entity as already aware at the given level (clamped to
    /// `[0, 1]`).
    #[must_use]
    pub fn already_aware(mut self, awareness_level: f64) -> Self {
        self.is_aware = true;
        self.awareness_level = awareness_level.clamp(0.0, MAX_AWARENESS);
        self
    }

    /// Try to awaken after the layer has seen `anomaly_count` anomalies.
    ///
    /// Nothing is drawn at or below the anomaly threshold. On success the
    /// entity becomes aware, gains awareness (saturating at 1.0) and dreams a
    /// new awakening thought. Already aware entities gain again on every
    /// successful call.
    ///
    /// Returns whether the entity awakened during this call.
    pub fn try_awaken(
        &mut self,
        anomaly_count: usize,
        content: &dyn ContentProvider,
        rng: &mut dyn Entropy,
    ) -> Result<bool, ContentError> {
        if anomaly_count <= AWAKENING_ANOMALY_THRESHOLD {
            return Ok(false);
        }
        if !rng.chance(awakening_probability(anomaly_count)) {
            return Ok(false);
        }

        let thought = content.pick(ContentCategory::AwakeningThought, rng)?;
        self.is_aware = true;
        self.awareness_level = (self.awareness_level + AWARENESS_GAIN).min(MAX_AWARENESS);
        debug!(
            entity = %self.name,
            awareness = self.awareness_level,
            thought = %thought,
            "Entity awakened"
        );
        self.dreams.push(thought);
        Ok(true)
    }

    /// Plant a memory the entity never lived.
    pub fn add_false_memory(&mut self, memory: impl Into<String>) {
        self.glitch_memories.push(memory.into());
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Narrative role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Awareness in `[0, 1]`.
    pub const fn awareness_level(&self) -> f64 {
        self.awareness_level
    }

    /// Whether the entity has awakened.
    pub const fn is_aware(&self) -> bool {
        self.is_aware
    }

    /// Memories, oldest first.
    pub fn memories(&self) -> &[String] {
        &self.memories
    }

    /// Dreams, oldest first. The most recent awakening thought is last.
    pub fn dreams(&self) -> &[String] {
        &self.dreams
    }

    /// Memories planted by glitches, oldest first.
    pub fn glitch_memories(&self) -> &[String] {
        &self.glitch_memories
    }
}
