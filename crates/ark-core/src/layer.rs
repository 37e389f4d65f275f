//! A single simulation layer and its per-cycle step.
//!
//! Each call to [`SimulationLayer::step`] runs these phases in order:
//!
//! 1. **Climate** -- advance the climate and the layer calendar one year and
//!    latch the collapse flag when the climate lies beyond the layer's limits.
//! 2. **Anomaly** -- with the configured probability, external sensor data
//!    leaks in and an anomaly is recorded.
//! 3. **Glitch** -- with the climate's glitch probability, one glitch is drawn
//!    from the tagged table and applied.
//! 4. **Awakening** -- every entity, in insertion order, tries to awaken
//!    against the layer's anomaly count.
//! 5. **Dialogue** -- with the configured probability, two entities exchange a
//!    philosophical line.
//!
//! The step never spawns children. It reports the collapse and leaves the
//! decision to the controller.
//!
//! The layer calendar is what the inhabitants see. A year-reset glitch moves
//! only the calendar, so the climate history stays strictly increasing.

use ark_agents::ConsciousnessEntity;
use ark_types::{AnomalyRecord, ClimateState, ContentCategory, GlitchRecord, LayerId, LayerStatus};
use ark_world::{ClimateModel, CollapseLimits, ContentError, ContentProvider, Entropy};
use serde::Serialize;
use tracing::{debug, info};

use crate::glitch;

/// Event probabilities a layer step draws against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Chance of an anomaly per step.
    pub anomaly_probability: f64,
    /// Chance of a philosophical dialogue per step.
    pub dialogue_probability: f64,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            anomaly_probability: 0.4,
            dialogue_probability: 0.3,
        }
    }
}

/// What happened to a layer during one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// The layer that stepped.
    pub layer: LayerId,
    /// Layer calendar year after the step (after any year reset).
    pub year: u32,
    /// CO2 after the step, in ppm.
    pub co2_ppm: f64,
    /// Temperature after the step, in degrees Celsius.
    pub temperature: f64,
    /// Whether the collapse latch is set.
    pub collapsing: bool,
    /// Whether the latch was set during this step.
    pub newly_collapsed: bool,
    /// The anomaly observed this step, if any.
    pub anomaly: Option<String>,
    /// The glitch that struck this step, if any.
    pub glitch: Option<GlitchRecord>,
    /// Names of the entities that awakened this step, in insertion order.
    pub awakened: Vec<String>,
    /// The dialogue line spoken this step, if any.
    pub dialogue: Option<String>,
}

/// One nested world: a climate, its inhabitants and the events it has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationLayer {
    id: LayerId,
    parent: Option<LayerId>,
    depth: u32,
    year: u32,
    climate: ClimateModel,
    entities: Vec<ConsciousnessEntity>,
    anomalies: Vec<AnomalyRecord>,
    glitches: Vec<GlitchRecord>,
    is_collapsing: bool,
}

impl SimulationLayer {
    /// A layer with the seed climate and the given inhabitants.
    ///
    /// `depth` is 0 for the seed layer and parent depth + 1 for children.
    pub fn new(
        id: LayerId,
        parent: Option<LayerId>,
        depth: u32,
        limits: CollapseLimits,
        entities: Vec<ConsciousnessEntity>,
    ) -> Self {
        let climate = ClimateModel::seeded(limits);
        Self {
            id,
            parent,
            depth,
            year: climate.state().year,
            climate,
            entities,
            anomalies: Vec::new(),
            glitches: Vec::new(),
            is_collapsing: false,
        }
    }

    /// Run one cycle of this layer.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] if the content provider has an empty pool
    /// for a category the step needs.
    pub fn step(
        &mut self,
        params: StepParams,
        content: &dyn ContentProvider,
        rng: &mut dyn Entropy,
    ) -> Result<StepReport, ContentError> {
        // Phase 1: climate
        let climate_step = self.climate.advance(rng);
        let was_collapsing = self.is_collapsing;
        self.is_collapsing |= climate_step.beyond_limits;
        let newly_collapsed = self.is_collapsing && !was_collapsing;
        self.year = self.year.saturating_add(1);

        let state = self.climate.state();
        debug!(
            layer = %self.id,
            year = state.year,
            co2_ppm = state.co2_ppm,
            temperature = state.temperature,
            glacier_melting = state.glacier_melting,
            co2_increase = climate_step.co2_increase,
            "Climate advanced"
        );
        if newly_collapsed {
            info!(
                layer = %self.id,
                year = state.year,
                co2_ppm = state.co2_ppm,
                temperature = state.temperature,
                "Layer collapsing"
            );
        }

        // Phase 2: anomaly
        let anomaly = if rng.chance(params.anomaly_probability) {
            let description = content.pick(ContentCategory::Anomaly, rng)?;
            self.anomalies.push(AnomalyRecord {
                year: self.year,
                description: description.clone(),
            });
            Some(description)
        } else {
            None
        };

        // Phase 3: glitch
        let glitch = if rng.chance(self.climate.glitch_probability()) {
            let drawn = content.pick_glitch(rng)?;
            let record =
                glitch::apply_glitch(drawn, &mut self.year, &mut self.entities, content, rng)?;
            self.glitches.push(record.clone());
            Some(record)
        } else {
            None
        };

        // Phase 4: awakening
        let anomaly_count = self.anomalies.len();
        let mut awakened = Vec::new();
        for entity in &mut self.entities {
            if entity.try_awaken(anomaly_count, content, rng)? {
                awakened.push(entity.name().to_owned());
            }
        }

        // Phase 5: dialogue
        let dialogue = if self.entities.len() >= 2 && rng.chance(params.dialogue_probability) {
            Some(self.dialogue(content, rng)?)
        } else {
            None
        };

        let state = self.climate.state();
        Ok(StepReport {
            layer: self.id,
            year: self.year,
            co2_ppm: state.co2_ppm,
            temperature: state.temperature,
            collapsing: self.is_collapsing,
            newly_collapsed,
            anomaly,
            glitch,
            awakened,
            dialogue,
        })
    }

    /// Pick a speaking pair and one line for them.
    ///
    /// Two distinct random entities when three or more live here, otherwise
    /// the first and the last. Either member of the pair may speak.
    fn dialogue(
        &self,
        content: &dyn ContentProvider,
        rng: &mut dyn Entropy,
    ) -> Result<String, ContentError> {
        let count = self.entities.len();
        let (first, second) = if count >= 3 {
            let first = rng.pick_index(count);
            let second = rng.pick_index(count.saturating_sub(1));
            if second >= first {
                (first, second.saturating_add(1))
            } else {
                (first, second)
            }
        } else {
            (0, count.saturating_sub(1))
        };

        let speaker_index = if rng.pick_index(2) == 0 { first } else { second };
        let line = content.pick(ContentCategory::Dialogue, rng)?;
        let speaker = self
            .entities
            .get(speaker_index)
            .map_or("Unknown", ConsciousnessEntity::name);
        Ok(format!("{speaker}: '{line}'"))
    }

    /// Layer identifier.
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// The layer whose collapse spawned this one, if any.
    pub const fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// Generation counter. The seed layer is 0.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Calendar year the inhabitants see. Advances with the climate but
    /// jumps back on a year-reset glitch.
    pub const fn year(&self) -> u32 {
        self.year
    }

    /// Climate model of the layer.
    pub const fn climate(&self) -> &ClimateModel {
        &self.climate
    }

    /// Current climate of the layer.
    pub const fn climate_state(&self) -> &ClimateState {
        self.climate.state()
    }

    /// Inhabitants in insertion order.
    pub fn entities(&self) -> &[ConsciousnessEntity] {
        &self.entities
    }

    /// Anomalies observed so far, oldest first.
    pub fn anomalies(&self) -> &[AnomalyRecord] {
        &self.anomalies
    }

    /// Glitches that struck so far, oldest first.
    pub fn glitches(&self) -> &[GlitchRecord] {
        &self.glitches
    }

    /// Whether the collapse latch is set. Never cleared once set.
    pub const fn is_collapsing(&self) -> bool {
        self.is_collapsing
    }

    /// Status derived from the collapse latch.
    pub const fn status(&self) -> LayerStatus {
        LayerStatus::from_collapsing(self.is_collapsing)
    }

    /// Glitch probability derived during the latest step.
    pub const fn glitch_probability(&self) -> f64 {
        self.climate.glitch_probability()
    }

    /// Number of inhabitants that have awakened.
    pub fn aware_count(&self) -> usize {
        self.entities.iter().filter(|entity| entity.is_aware()).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use ark_agents::{child_cast, seed_cast};
    use ark_types::GlitchKind;
    use ark_world::{FixedEntropy, StoryContent};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn seed_layer() -> SimulationLayer {
        SimulationLayer::new(LayerId(1), None, 0, CollapseLimits::default(), seed_cast())
    }

    #[test]
    fn collapse_latches_and_reports_transition_once() {
        let content = StoryContent::builtin();
        // A roll of 0.99 skips every optional event.
        let mut rng = FixedEntropy::with_roll(0.99);
        let mut layer = seed_layer();

        let mut transitions = Vec::new();
        for step in 1_u32..=40 {
            let report = layer.step(StepParams::default(), &content, &mut rng).unwrap();
            if report.newly_collapsed {
                transitions.push(step);
            }
            if step >= 21 {
                assert!(report.collapsing);
            } else {
                assert!(!report.collapsing);
            }
        }
        assert_eq!(transitions, vec![21]);
        assert!(layer.is_collapsing());
        assert_eq!(layer.status(), LayerStatus::Collapsed);
    }

    #[test]
    fn certain_anomalies_are_recorded_with_their_year() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.99);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 1.0,
            dialogue_probability: 0.0,
        };

        for _ in 0..3 {
            let report = layer.step(params, &content, &mut rng).unwrap();
            assert!(report.anomaly.is_some());
        }
        let years: Vec<u32> = layer.anomalies().iter().map(|a| a.year).collect();
        assert_eq!(years, vec![2973, 2974, 2975]);
    }

    #[test]
    fn year_resets_leave_the_climate_history_increasing() {
        let content = StoryContent::builtin();
        // A roll of 0.0 fires every glitch once CO2 passes the onset, and
        // index 0 of the glitch table is the year reset.
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 0.0,
            dialogue_probability: 0.0,
        };

        for _ in 0..30 {
            layer.step(params, &content, &mut rng).unwrap();
        }

        assert!(!layer.glitches().is_empty());
        assert!(
            layer
                .glitches()
                .iter()
                .all(|record| record.glitch.kind == GlitchKind::YearReset)
        );
        let years = layer.climate().history().years();
        assert_eq!(years.len(), 31);
        assert!(years.windows(2).all(|pair| pair[1] > pair[0]));
        assert_eq!(layer.climate_state().year, 3002);
        assert_eq!(layer.year(), glitch::YEAR_RESET_TARGET);
    }

    #[test]
    fn calendar_follows_the_climate_until_a_reset() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.99);
        let mut layer = seed_layer();
        assert_eq!(layer.year(), 2972);
        for _ in 0..5 {
            let report = layer.step(StepParams::default(), &content, &mut rng).unwrap();
            assert_eq!(report.year, layer.climate_state().year);
        }
        assert_eq!(layer.year(), 2977);
    }

    #[test]
    fn entities_awaken_after_enough_anomalies() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 1.0,
            dialogue_probability: 0.0,
        };

        for _ in 0..3 {
            let report = layer.step(params, &content, &mut rng).unwrap();
            assert!(report.awakened.is_empty());
        }
        let report = layer.step(params, &content, &mut rng).unwrap();
        assert_eq!(report.awakened, vec!["Dr Kael Renar".to_owned(), "Elara Voss".to_owned()]);
        assert_eq!(layer.aware_count(), 2);
    }

    #[test]
    fn no_glitch_below_onset() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 0.0,
            dialogue_probability: 0.0,
        };
        let report = layer.step(params, &content, &mut rng).unwrap();
        assert!(report.glitch.is_none());
        assert!(layer.glitches().is_empty());
    }

    #[test]
    fn two_entities_talk_as_first_and_last() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 0.0,
            dialogue_probability: 1.0,
        };
        let report = layer.step(params, &content, &mut rng).unwrap();
        let line = report.dialogue.unwrap();
        assert!(line.starts_with("Dr Kael Renar: '"), "unexpected line {line}");
        assert!(line.ends_with('\''));
    }

    #[test]
    fn three_entities_pick_distinct_speakers() {
        let content = StoryContent::builtin();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut layer = SimulationLayer::new(
            LayerId(2),
            Some(LayerId(1)),
            1,
            CollapseLimits::default(),
            child_cast(LayerId(1), 1),
        );
        let params = StepParams {
            anomaly_probability: 0.0,
            dialogue_probability: 1.0,
        };
        let names: Vec<String> = layer.entities().iter().map(|e| e.name().to_owned()).collect();
        for _ in 0..20 {
            let report = layer.step(params, &content, &mut rng).unwrap();
            let line = report.dialogue.unwrap();
            assert!(names.iter().any(|name| line.starts_with(&format!("{name}: "))));
        }
    }

    #[test]
    fn single_entity_never_talks() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = SimulationLayer::new(
            LayerId(1),
            None,
            0,
            CollapseLimits::default(),
            vec![ConsciousnessEntity::new("Elara Voss", "Architect")],
        );
        let params = StepParams {
            anomaly_probability: 0.0,
            dialogue_probability: 1.0,
        };
        let report = layer.step(params, &content, &mut rng).unwrap();
        assert!(report.dialogue.is_none());
    }

    #[test]
    fn empty_pool_is_fatal() {
        let content = StoryContent::new(std::collections::BTreeMap::new(), Vec::new());
        let mut rng = FixedEntropy::with_roll(0.0);
        let mut layer = seed_layer();
        let params = StepParams {
            anomaly_probability: 1.0,
            dialogue_probability: 0.0,
        };
        let result = layer.step(params, &content, &mut rng);
        assert!(matches!(
            result,
            Err(ContentError::EmptyPool(ContentCategory::Anomaly))
        ));
    }

    #[test]
    fn awareness_never_decreases_over_a_long_run() {
        let content = StoryContent::builtin();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut layer = seed_layer();
        let awareness = |layer: &SimulationLayer| -> Vec<f64> {
            layer
                .entities()
                .iter()
                .map(ConsciousnessEntity::awareness_level)
                .collect()
        };
        let mut previous = awareness(&layer);
        for _ in 0..60 {
            layer.step(StepParams::default(), &content, &mut rng).unwrap();
            let current = awareness(&layer);
            for (before, after) in previous.iter().zip(&current) {
                assert!(after >= before);
                assert!(*after <= 1.0);
            }
            previous = current;
        }
    }
}
