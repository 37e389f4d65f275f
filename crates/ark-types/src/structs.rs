//! Plain data structs shared between the engine crates.
//!
//! Everything here is serializable so the recorded history of a run can be
//! handed to a visualization consumer as JSON.

use serde::{Deserialize, Serialize};

use crate::enums::GlitchKind;

// ---------------------------------------------------------------------------
// Seed climate
// ---------------------------------------------------------------------------

/// CO2 concentration every layer starts with, in ppm.
pub const SEED_CO2_PPM: f64 = 600.0;

/// Mean temperature every layer starts with, in degrees Celsius.
pub const SEED_TEMPERATURE: f64 = 15.0;

/// Glacier melt index every layer starts with.
pub const SEED_GLACIER_MELTING: f64 = 0.3;

/// Calendar year every layer starts in.
pub const SEED_YEAR: u32 = 2972;

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------

/// The four climate feedback coefficients.
///
/// Recomputed from the current climate at the start of every advance and
/// overwritten, never accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLoops {
    /// Glacier melt lowers albedo and traps more heat.
    pub ice_albedo: f64,
    /// Warming thaws permafrost and releases methane.
    pub methane_release: f64,
    /// Dissolved CO2 acidifies the oceans.
    pub ocean_acidification: f64,
    /// Warming changes cloud formation.
    pub cloud_formation: f64,
}

impl FeedbackLoops {
    /// Sum of all four coefficients.
    pub fn total(&self) -> f64 {
        self.ice_albedo + self.methane_release + self.ocean_acidification + self.cloud_formation
    }
}

/// Climate state of a single layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    /// Atmospheric CO2 in ppm.
    pub co2_ppm: f64,
    /// Mean temperature in degrees Celsius.
    pub temperature: f64,
    /// Cumulative glacier melt index.
    pub glacier_melting: f64,
    /// Whether methane storms tear through the cities. Set, never cleared.
    pub methane_storms: bool,
    /// Current calendar year of the layer.
    pub year: u32,
    /// Feedback coefficients computed during the most recent advance.
    pub feedback: FeedbackLoops,
}

impl ClimateState {
    /// The climate every freshly spawned layer starts from.
    ///
    /// Methane storms are already raging in the seed world.
    pub const fn seed() -> Self {
        Self {
            co2_ppm: SEED_CO2_PPM,
            temperature: SEED_TEMPERATURE,
            glacier_melting: SEED_GLACIER_MELTING,
            methane_storms: true,
            year: SEED_YEAR,
            feedback: FeedbackLoops {
                ice_albedo: 0.0,
                methane_release: 0.0,
                ocean_acidification: 0.0,
                cloud_formation: 0.0,
            },
        }
    }
}

impl Default for ClimateState {
    fn default() -> Self {
        Self::seed()
    }
}

/// Index-aligned climate time series of one layer.
///
/// The three vectors always have the same length; entry `i` of each belongs
/// to the same sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateHistory {
    years: Vec<u32>,
    co2_ppm: Vec<f64>,
    temperature: Vec<f64>,
}

impl ClimateHistory {
    /// Start a history with the given climate as its first sample.
    pub fn starting_at(state: &ClimateState) -> Self {
        let mut history = Self::default();
        history.record(state);
        history
    }

    /// Append one sample taken from `state`.
    pub fn record(&mut self, state: &ClimateState) {
        self.years.push(state.year);
        self.co2_ppm.push(state.co2_ppm);
        self.temperature.push(state.temperature);
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether no samples were recorded.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Year of every sample.
    pub fn years(&self) -> &[u32] {
        &self.years
    }

    /// CO2 of every sample.
    pub fn co2_ppm(&self) -> &[f64] {
        &self.co2_ppm
    }

    /// Temperature of every sample.
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An anomaly observed in a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Layer calendar year the anomaly appeared in.
    pub year: u32,
    /// What was observed.
    pub description: String,
}

/// A glitch drawn from the glitch table: its effect and its flavor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glitch {
    /// The effect applied to the layer.
    pub kind: GlitchKind,
    /// Narrative description.
    pub description: String,
}

/// A glitch that struck a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchRecord {
    /// Layer calendar year the glitch struck in (before any year reset).
    pub year: u32,
    /// The glitch itself.
    pub glitch: Glitch,
    /// The false memory planted, for [`GlitchKind::FalseMemory`].
    pub planted_memory: Option<String>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn seed_climate_matches_constants() {
        let seed = ClimateState::seed();
        assert_eq!(seed.co2_ppm, SEED_CO2_PPM);
        assert_eq!(seed.temperature, SEED_TEMPERATURE);
        assert_eq!(seed.glacier_melting, SEED_GLACIER_MELTING);
        assert_eq!(seed.year, SEED_YEAR);
        assert!(seed.methane_storms);
        assert_eq!(seed.feedback.total(), 0.0);
    }

    #[test]
    fn history_series_stay_aligned() {
        let mut state = ClimateState::seed();
        let mut history = ClimateHistory::starting_at(&state);
        state.year += 1;
        state.co2_ppm += 5.0;
        history.record(&state);

        assert_eq!(history.len(), 2);
        assert_eq!(history.years(), &[2972, 2973]);
        assert_eq!(history.co2_ppm().len(), 2);
        assert_eq!(history.temperature().len(), 2);
    }
}
