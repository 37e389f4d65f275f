//! Enumeration types for the Simulated Ark layer engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Content categories
// ---------------------------------------------------------------------------

/// A pool of narrative text a content provider can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    /// Anomalies leaking in from external sensor data.
    Anomaly,
    /// Descriptions of glitches.
    Glitch,
    /// Signals received from galactic depths.
    Signal,
    /// Lines of philosophical dialogue between two entities.
    Dialogue,
    /// Memories a glitch plants into an entity.
    FalseMemory,
    /// Thoughts an entity dreams when it awakens.
    AwakeningThought,
}

impl ContentCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Anomaly,
        Self::Glitch,
        Self::Signal,
        Self::Dialogue,
        Self::FalseMemory,
        Self::AwakeningThought,
    ];
}

impl core::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Anomaly => "anomaly",
            Self::Glitch => "glitch",
            Self::Signal => "signal",
            Self::Dialogue => "dialogue",
            Self::FalseMemory => "false_memory",
            Self::AwakeningThought => "awakening_thought",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Glitches
// ---------------------------------------------------------------------------

/// The state effect a glitch has on the layer it strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlitchKind {
    /// The layer's climate year jumps back to a fixed past year.
    YearReset,
    /// One randomly chosen entity receives a false memory.
    FalseMemory,
    /// Every entity remembers having been somewhere else.
    Teleportation,
    /// Narrative only; no state changes.
    Narrative,
}

// ---------------------------------------------------------------------------
// Layer status
// ---------------------------------------------------------------------------

/// Lifecycle status of a simulation layer as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerStatus {
    /// Climate is below both collapse thresholds.
    Active,
    /// The collapse latch has been set.
    Collapsed,
}

impl LayerStatus {
    /// Map the collapse latch to a status.
    pub const fn from_collapsing(is_collapsing: bool) -> Self {
        if is_collapsing { Self::Collapsed } else { Self::Active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_matches_serde_name() {
        for category in ContentCategory::ALL {
            let json = serde_json::to_string(&category).unwrap_or_default();
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn status_follows_latch() {
        assert_eq!(LayerStatus::from_collapsing(false), LayerStatus::Active);
        assert_eq!(LayerStatus::from_collapsing(true), LayerStatus::Collapsed);
    }
}
