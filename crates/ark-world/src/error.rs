//! Error types for the `ark-world` crate.

use ark_types::ContentCategory;

/// Errors raised by a content provider.
///
/// A broken content pool is a defect in the provider, so callers treat these
/// as fatal and propagate them.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The pool for the requested category holds no entries.
    #[error("content pool for {0} is empty")]
    EmptyPool(ContentCategory),

    /// The glitch table holds no entries.
    #[error("glitch table is empty")]
    EmptyGlitchTable,
}
