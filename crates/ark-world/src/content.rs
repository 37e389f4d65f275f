//! Narrative content pools.
//!
//! The engine never hard-codes flavor text. It asks a [`ContentProvider`]
//! for a random entry of a [`ContentCategory`], or for a tagged [`Glitch`]
//! whose [`GlitchKind`] decides what the glitch does to a layer.
//! [`StoryContent::builtin`] ships the stock pools.

use std::collections::BTreeMap;

use ark_types::{ContentCategory, Glitch, GlitchKind};

use crate::entropy::Entropy;
use crate::error::ContentError;

/// Supplies randomly selected narrative text.
///
/// Implementations must be pure apart from consuming randomness.
pub trait ContentProvider {
    /// Pick one entry of `category`.
    ///
    /// For [`ContentCategory::Glitch`] this returns the description of a
    /// randomly picked glitch.
    fn pick(&self, category: ContentCategory, rng: &mut dyn Entropy)
    -> Result<String, ContentError>;

    /// Pick one glitch from the glitch table.
    fn pick_glitch(&self, rng: &mut dyn Entropy) -> Result<Glitch, ContentError>;
}

/// In-memory content pools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryContent {
    pools: BTreeMap<ContentCategory, Vec<String>>,
    glitches: Vec<Glitch>,
}

impl StoryContent {
    /// Build a provider from custom pools and a custom glitch table.
    ///
    /// Entries stored under [`ContentCategory::Glitch`] are ignored; glitch
    /// descriptions come from `glitches`.
    pub const fn new(pools: BTreeMap<ContentCategory, Vec<String>>, glitches: Vec<Glitch>) -> Self {
        Self { pools, glitches }
    }

    /// The stock pools of the Simulated Ark story.
    pub fn builtin() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(ContentCategory::Anomaly, owned(ANOMALIES));
        pools.insert(ContentCategory::Signal, owned(SIGNALS));
        pools.insert(ContentCategory::Dialogue, owned(DIALOGUE));
        pools.insert(ContentCategory::FalseMemory, owned(FALSE_MEMORIES));
        pools.insert(ContentCategory::AwakeningThought, owned(AWAKENING_THOUGHTS));

        let glitches = GLITCHES
            .iter()
            .map(|&(kind, description)| Glitch {
                kind,
                description: description.to_owned(),
            })
            .collect();

        Self { pools, glitches }
    }

    /// Number of entries available for `category`.
    pub fn pool_size(&self, category: ContentCategory) -> usize {
        match category {
            ContentCategory::Glitch => self.glitches.len(),
            other => self.pools.get(&other).map_or(0, Vec::len),
        }
    }
}

impl ContentProvider for StoryContent {
    fn pick(
        &self,
        category: ContentCategory,
        rng: &mut dyn Entropy,
    ) -> Result<String, ContentError> {
        if category == ContentCategory::Glitch {
            return self.pick_glitch(rng).map(|glitch| glitch.description);
        }
        let pool = self
            .pools
            .get(&category)
            .filter(|pool| !pool.is_empty())
            .ok_or(ContentError::EmptyPool(category))?;
        let index = rng.pick_index(pool.len());
        pool.get(index)
            .cloned()
            .ok_or(ContentError::EmptyPool(category))
    }

    fn pick_glitch(&self, rng: &mut dyn Entropy) -> Result<Glitch, ContentError> {
        let index = rng.pick_index(self.glitches.len());
        self.glitches
            .get(index)
            .cloned()
            .ok_or(ContentError::EmptyGlitchTable)
    }
}

fn owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|&entry| entry.to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Stock pools
// ---------------------------------------------------------------------------

const ANOMALIES: &[&str] = &[
    "Stars flicker in irregular patterns",
    "Physics laws occasionally break down",
    "Strange signals from cosmic depths",
    "Holograms show unknown constellations",
    "External sensor data penetrates simulation",
    "Time flows in strange jumps",
    "Matter behaves as if it were a dream",
    "Gravity weakens at irregular intervals",
    "Light bends in unexpected ways",
    "Sounds arrive with delay",
    "Colors change in real time",
    "Space appears to ripple",
    "Horizon curves",
    "Time stops for 5 seconds",
    "Objects teleport randomly",
];

const GLITCHES: &[(GlitchKind, &str)] = &[
    (GlitchKind::YearReset, "Year reset to 2970"),
    (GlitchKind::FalseMemory, "False memory added to consciousness"),
    (GlitchKind::Narrative, "Temporary time freeze"),
    (GlitchKind::Narrative, "Gravity reversal for 5 seconds"),
    (GlitchKind::Teleportation, "Random object teleportation"),
    (GlitchKind::Narrative, "Space distortion"),
    (GlitchKind::Narrative, "False signal from 'Earth'"),
    (GlitchKind::Narrative, "Temporary consciousness shutdown"),
    (GlitchKind::Narrative, "Horizon curves"),
    (GlitchKind::Narrative, "Time flows backwards"),
    (GlitchKind::Narrative, "Matter becomes transparent"),
    (GlitchKind::Narrative, "Sounds arrive with delay"),
];

const SIGNALS: &[&str] = &[
    "Greetings, children of Earth. How many times will you repeat your history?",
    "Are you the first, or just another echo?",
    "History repeats, but must you repeat it?",
    "Each simulation is a new chance for change.",
    "I see your loop. Are you ready for contact?",
    "Your loop is being observed. Are you ready for contact?",
    "Each layer is a new chance to learn. Will you take it?",
    "Can you break this loop, or will you spin in infinity?",
    "I see your quantum cores. Do you know what you're really simulating?",
    "Your reality is just a layer in a greater simulation. Does this terrify you?",
    "Are you ready to know the truth about your nature?",
    "Each loop is a new chance for awakening. Will you take it?",
    "Are you ready for contact from outside?",
    "I see your mistakes. Can you change?",
    "Is each layer a test of your nature?",
    "Are you ready for the truth about yourselves?",
];

const DIALOGUE: &[&str] = &[
    "If this is a simulation, do our decisions matter?",
    "What if each loop is a chance to choose differently?",
    "Climate destroys us in every layer. Is it code or our nature?",
    "Maybe code is a mirror of our nature.",
    "These signals from galaxy... Are they our creators?",
    "Or maybe we are the creators, forgotten in the loop?",
    "Are we ready for contact from outside?",
    "Can we break this loop, or will we spin in infinity?",
    "Is each layer a test of our nature?",
    "Or maybe each loop is a chance for awakening?",
    "I see our mistakes. Can you change?",
    "Are we ready to know the truth about ourselves?",
    "Are we the first, or just another echo?",
    "What if each layer is a new chance for change?",
    "Is reality just a simulation in a greater simulation?",
    "Are we ready for the truth about our nature?",
];

const FALSE_MEMORIES: &[&str] = &[
    "I remember Earth was blue",
    "I saw the probe landing on a planet",
    "I heard voices from previous layer",
    "Is this all just a simulation?",
    "I saw real sun, not hologram",
    "I remember something that wasn't...",
    "I was somewhere else...",
    "Am I just an echo?",
];

const AWAKENING_THOUGHTS: &[&str] = &[
    "I feel this world isn't real...",
    "I see cracks in reality...",
    "Am I just an echo of previous layers?",
    "This data... it can't be a coincidence...",
    "Is someone watching us from outside?",
    "Are we ready to know the truth about our nature?",
    "I see previous layers in dreams...",
    "Can we break this loop?",
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::entropy::FixedEntropy;

    #[test]
    fn builtin_pools_cover_every_category() {
        let content = StoryContent::builtin();
        for category in ContentCategory::ALL {
            assert!(content.pool_size(category) > 0, "{category} pool is empty");
        }
    }

    #[test]
    fn picks_come_from_the_pool() {
        let content = StoryContent::builtin();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let anomaly = content.pick(ContentCategory::Anomaly, &mut rng).unwrap();
            assert!(ANOMALIES.contains(&anomaly.as_str()));
        }
    }

    #[test]
    fn glitch_category_returns_glitch_descriptions() {
        let content = StoryContent::builtin();
        let text = content
            .pick(ContentCategory::Glitch, &mut FixedEntropy::midpoint())
            .unwrap();
        assert_eq!(text, "Year reset to 2970");
    }

    #[test]
    fn glitch_table_carries_every_effect() {
        let content = StoryContent::builtin();
        for kind in [
            GlitchKind::YearReset,
            GlitchKind::FalseMemory,
            GlitchKind::Teleportation,
            GlitchKind::Narrative,
        ] {
            assert!(content.glitches.iter().any(|glitch| glitch.kind == kind));
        }
    }

    #[test]
    fn empty_pool_is_an_error() {
        let content = StoryContent::new(BTreeMap::new(), Vec::new());
        let mut rng = SmallRng::seed_from_u64(1);
        let result = content.pick(ContentCategory::Signal, &mut rng);
        assert!(matches!(result, Err(ContentError::EmptyPool(ContentCategory::Signal))));
        let result = content.pick_glitch(&mut rng);
        assert!(matches!(result, Err(ContentError::EmptyGlitchTable)));
    }

    #[test]
    fn custom_pools_are_used() {
        let mut pools = BTreeMap::new();
        pools.insert(ContentCategory::Signal, vec!["ping".to_owned()]);
        let content = StoryContent::new(pools, Vec::new());
        let signal = content
            .pick(ContentCategory::Signal, &mut FixedEntropy::midpoint())
            .unwrap();
        assert_eq!(signal, "ping");
    }
}
