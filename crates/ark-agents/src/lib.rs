//! Narrative agents of the Simulated Ark.
//!
//! This crate holds the logic layer for the consciousness entities that live
//! inside simulation layers. It sits between `ark-world` (randomness and
//! content) and `ark-core` (which owns the layers that own the entities).
//!
//! # Modules
//!
//! - [`cast`] -- Scripted inhabitants of seed and child layers
//! - [`consciousness`] -- [`ConsciousnessEntity`] and the awakening rule

pub mod cast;
pub mod consciousness;

// Re-export primary types at crate root for convenience.
pub use cast::{child_cast, seed_cast};
pub use consciousness::{ConsciousnessEntity, awakening_probability};
