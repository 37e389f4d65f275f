//! Error types for the Ark engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run and the history export.

use std::path::PathBuf;

/// Top-level error for the Ark engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ark_core::config::ConfigError,
    },

    /// The run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ark_core::runner::RunnerError,
    },

    /// The history could not be serialized.
    #[error("failed to serialize run history: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The history could not be written.
    #[error("failed to write {path}: {source}")]
    Export {
        /// File or directory being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
