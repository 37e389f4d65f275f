//! The randomness seam of the simulation.
//!
//! Every random draw in the engine goes through [`Entropy`]. Production code
//! passes a single seeded [`rand`] generator down the call chain; any
//! [`rand::Rng`] implements [`Entropy`] through the blanket impl below. Tests
//! can pass [`FixedEntropy`] to pin every draw to a known value.

use rand::Rng;

/// Source of the random draws the simulation consumes.
///
/// The trait is object safe so components take `&mut dyn Entropy` and stay
/// independent of the concrete generator.
pub trait Entropy {
    /// A uniform value in `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// A uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// An index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// A uniform integer in `low..=high`. Returns `low` when `high < low`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32;

    /// Whether an event with the given probability happens.
    ///
    /// The probability is not clamped: anything above 1 always succeeds and
    /// anything at or below 0 never does.
    fn chance(&mut self, probability: f64) -> bool {
        self.roll() < probability
    }
}

impl<R: Rng + ?Sized> Entropy for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            self.random_range(low..high)
        } else {
            low
        }
    }

    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { self.random_range(0..len) }
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high > low {
            self.random_range(low..=high)
        } else {
            low
        }
    }
}

/// Deterministic [`Entropy`] that always lands on the same values.
///
/// Uniform draws return the midpoint of their range, rolls return the
/// configured value, and index picks return the first element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEntropy {
    roll: f64,
}

impl FixedEntropy {
    /// Midpoint draws with every roll returning `0.5`.
    pub const fn midpoint() -> Self {
        Self { roll: 0.5 }
    }

    /// Midpoint draws with every roll returning `roll`.
    pub const fn with_roll(roll: f64) -> Self {
        Self { roll }
    }
}

impl Entropy for FixedEntropy {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low { (low + high) / 2.0 } else { low }
    }

    fn roll(&mut self) -> f64 {
        self.roll
    }

    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high > low {
            low.saturating_add(high.saturating_sub(low) / 2)
        } else {
            low
        }
    }
}
