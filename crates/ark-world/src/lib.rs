//! Climate, randomness and narrative content for the Simulated Ark.
//!
//! This crate models what a layer *is* before anyone lives in it: a climate
//! that heats up under compounding feedback, the single source of randomness
//! every draw goes through, and the pools of flavor text the story is told
//! with.
//!
//! # Modules
//!
//! - [`climate`] -- [`ClimateModel`] with feedback loops, collapse limits and
//!   glitch probability.
//! - [`content`] -- [`ContentProvider`] trait and the stock [`StoryContent`].
//! - [`entropy`] -- [`Entropy`] trait, blanket-implemented for `rand`
//!   generators, and the deterministic [`FixedEntropy`].
//! - [`error`] -- Error types for content lookups.

pub mod climate;
pub mod content;
pub mod entropy;
pub mod error;

// Re-export primary types at crate root.
pub use climate::{ClimateModel, ClimateStep, CollapseLimits, glitch_probability_for};
pub use content::{ContentProvider, StoryContent};
pub use entropy::{Entropy, FixedEntropy};
pub use error::ContentError;
