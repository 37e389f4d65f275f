//! Shared type definitions for the Simulated Ark layer engine.
//!
//! This crate is the single source of truth for the plain data that flows
//! between the climate model, the agents, the layer registry and the history
//! export.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for layers, quantum cores and runs
//! - [`enums`] -- Content categories, glitch kinds, layer status
//! - [`structs`] -- Climate state and history, anomaly and glitch records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ContentCategory, GlitchKind, LayerStatus};
pub use ids::{CoreId, LayerId, RunId};
pub use structs::{
    AnomalyRecord, ClimateHistory, ClimateState, FeedbackLoops, Glitch, GlitchRecord,
    SEED_CO2_PPM, SEED_GLACIER_MELTING, SEED_TEMPERATURE, SEED_YEAR,
};
