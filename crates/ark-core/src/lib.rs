//! Layer lifecycle, registry and cycle loop for the Simulated Ark.
//!
//! This crate owns everything that happens between the climate of a single
//! layer and the finished run: stepping layers, applying glitches, spawning
//! children when a layer collapses, and bounding the layer count by the
//! probe's quantum cores.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `ark-config.yaml` into
//!   strongly-typed structs.
//! - [`glitch`] -- Exhaustive dispatch of glitch effects.
//! - [`history`] -- [`RunHistory`] export for visualization consumers.
//! - [`layer`] -- [`SimulationLayer`] and its five-phase step.
//! - [`probe`] -- The probe, its quantum cores and signal detection.
//! - [`registry`] -- [`LayerRegistry`], the capacity-bounded layer set.
//! - [`runner`] -- The [`Ark`] controller and its cycle loop.
//!
//! [`RunHistory`]: history::RunHistory
//! [`SimulationLayer`]: layer::SimulationLayer
//! [`LayerRegistry`]: registry::LayerRegistry
//! [`Ark`]: runner::Ark

pub mod config;
pub mod glitch;
pub mod history;
pub mod layer;
pub mod probe;
pub mod registry;
pub mod runner;
