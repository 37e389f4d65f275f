//! Climate evolution for a single simulation layer.
//!
//! Each cycle the model draws a base CO2 increase and scales it by the sum of
//! four feedback loops computed from the climate as it stood *before* the
//! step:
//!
//! | Loop                | Coefficient                    |
//! |---------------------|--------------------------------|
//! | Ice albedo          | `glacier_melting * 0.5`        |
//! | Methane release     | `max(0, (T - 15) * 0.1)`       |
//! | Ocean acidification | `max(0, (co2 - 600) * 0.001)`  |
//! | Cloud formation     | `(T - 15) * 0.05`              |
//!
//! The scaled increase then feeds temperature and glacier melt, which raise
//! the coefficients of the next step. The coupling is multiplicative, so CO2
//! growth turns super-linear and every layer eventually crosses its collapse
//! limits.

use ark_types::{ClimateHistory, ClimateState, FeedbackLoops};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entropy::Entropy;

/// Range of the base CO2 increase drawn every step, in ppm.
pub const BASE_CO2_INCREASE: (f64, f64) = (3.0, 8.0);

/// Range of the base warming drawn every step, in degrees Celsius.
pub const BASE_WARMING: (f64, f64) = (0.15, 0.4);

/// Range of the base glacier melt drawn every step.
pub const BASE_GLACIER_MELT: (f64, f64) = (0.02, 0.08);

/// CO2 level above which methane storms break out.
pub const METHANE_STORM_CO2_PPM: f64 = 650.0;

/// Methane release coefficient above which methane storms break out.
pub const METHANE_STORM_RELEASE: f64 = 0.5;

/// CO2 level above which glitches start to appear.
pub const GLITCH_ONSET_CO2_PPM: f64 = 700.0;

/// Upper bound of the per-step glitch probability.
pub const MAX_GLITCH_PROBABILITY: f64 = 0.3;

/// Default CO2 collapse threshold, in ppm.
pub const DEFAULT_COLLAPSE_CO2_PPM: f64 = 750.0;

/// Default temperature collapse threshold, in degrees Celsius.
pub const DEFAULT_COLLAPSE_TEMPERATURE: f64 = 22.0;

/// Climate limits beyond which a layer collapses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapseLimits {
    /// CO2 level that triggers collapse when exceeded.
    pub co2_ppm: f64,
    /// Temperature that triggers collapse when exceeded.
    pub temperature: f64,
}

impl CollapseLimits {
    /// Whether `state` lies beyond either limit.
    pub fn exceeded_by(&self, state: &ClimateState) -> bool {
        state.co2_ppm > self.co2_ppm || state.temperature > self.temperature
    }
}

impl Default for CollapseLimits {
    fn default() -> Self {
        Self {
            co2_ppm: DEFAULT_COLLAPSE_CO2_PPM,
            temperature: DEFAULT_COLLAPSE_TEMPERATURE,
        }
    }
}

/// What a single [`ClimateModel::advance`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateStep {
    /// CO2 added this step after feedback scaling.
    pub co2_increase: f64,
    /// Whether the climate now lies beyond the collapse limits.
    pub beyond_limits: bool,
}

/// Compute the feedback coefficients for the given climate.
pub fn feedback_for(state: &ClimateState) -> FeedbackLoops {
    let warming = state.temperature - ark_types::SEED_TEMPERATURE;
    FeedbackLoops {
        ice_albedo: state.glacier_melting * 0.5,
        methane_release: (warming * 0.1).max(0.0),
        ocean_acidification: ((state.co2_ppm - ark_types::SEED_CO2_PPM) * 0.001).max(0.0),
        cloud_formation: warming * 0.05,
    }
}

/// Glitch probability at the given CO2 level.
///
/// Zero up to and including 700 ppm, then `(co2 - 700) / 1000` capped at 0.3.
pub fn glitch_probability_for(co2_ppm: f64) -> f64 {
    if co2_ppm > GLITCH_ONSET_CO2_PPM {
        ((co2_ppm - GLITCH_ONSET_CO2_PPM) / 1000.0).min(MAX_GLITCH_PROBABILITY)
    } else {
        0.0
    }
}

/// Climate state of one layer plus its recorded history.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateModel {
    state: ClimateState,
    history: ClimateHistory,
    limits: CollapseLimits,
    glitch_probability: f64,
}

impl ClimateModel {
    /// A model starting from the seed climate.
    pub fn seeded(limits: CollapseLimits) -> Self {
        Self::from_state(ClimateState::seed(), limits)
    }

    /// A model starting from an arbitrary climate.
    pub fn from_state(state: ClimateState, limits: CollapseLimits) -> Self {
        let history = ClimateHistory::starting_at(&state);
        let glitch_probability = glitch_probability_for(state.co2_ppm);
        Self {
            state,
            history,
            limits,
            glitch_probability,
        }
    }

    /// Advance the climate by one year.
    pub fn advance(&mut self, rng: &mut dyn Entropy) -> ClimateStep {
        let base_increase = rng.uniform(BASE_CO2_INCREASE.0, BASE_CO2_INCREASE.1);

        let feedback = feedback_for(&self.state);
        self.state.feedback = feedback;
        let co2_increase = base_increase * (1.0 + feedback.total() * 0.1);

        self.state.co2_ppm += co2_increase;
        self.state.temperature +=
            rng.uniform(BASE_WARMING.0, BASE_WARMING.1) + co2_increase * 0.01;
        self.state.glacier_melting +=
            rng.uniform(BASE_GLACIER_MELT.0, BASE_GLACIER_MELT.1) + co2_increase * 0.001;
        self.state.year = self.state.year.saturating_add(1);

        self.history.record(&self.state);

        if !self.state.methane_storms
            && (self.state.co2_ppm > METHANE_STORM_CO2_PPM
                || feedback.methane_release > METHANE_STORM_RELEASE)
        {
            self.state.methane_storms = true;
            debug!(
                year = self.state.year,
                co2_ppm = self.state.co2_ppm,
                "Methane storms broke out"
            );
        }

        self.glitch_probability = glitch_probability_for(self.state.co2_ppm);

        ClimateStep {
            co2_increase,
            beyond_limits: self.limits.exceeded_by(&self.state),
        }
    }

    /// Current climate.
    pub const fn state(&self) -> &ClimateState {
        &self.state
    }

    /// Every sample recorded so far, starting with the initial climate.
    pub const fn history(&self) -> &ClimateHistory {
        &self.history
    }

    /// Collapse limits of this model.
    pub const fn limits(&self) -> CollapseLimits {
        self.limits
    }

    /// Glitch probability derived during the latest advance.
    pub const fn glitch_probability(&self) -> f64 {
        self.glitch_probability
    }
}
