//! Glitch effects.
//!
//! A glitch is drawn from the tagged glitch table and its [`GlitchKind`]
//! decides what happens to the layer. Dispatch is an exhaustive match, so a
//! new kind cannot be added without deciding its effect here.

use ark_agents::ConsciousnessEntity;
use ark_types::{ContentCategory, Glitch, GlitchKind, GlitchRecord};
use ark_world::{ContentError, ContentProvider, Entropy};
use tracing::info;

/// Year the layer calendar jumps back to on a year-reset glitch.
pub const YEAR_RESET_TARGET: u32 = 2970;

/// Glitch memory every entity receives on a teleportation glitch.
pub const TELEPORT_MEMORY: &str = "I was somewhere else...";

/// Apply `glitch` to a layer's calendar and entities.
///
/// `calendar` is the layer's own year, not the climate year. The climate
/// and its history are never touched. The returned record carries the year
/// the glitch struck in, which is the calendar year before any reset.
pub fn apply_glitch(
    glitch: Glitch,
    calendar: &mut u32,
    entities: &mut [ConsciousnessEntity],
    content: &dyn ContentProvider,
    rng: &mut dyn Entropy,
) -> Result<GlitchRecord, ContentError> {
    let year = *calendar;
    let mut planted_memory = None;

    match glitch.kind {
        GlitchKind::YearReset => *calendar = YEAR_RESET_TARGET,
        GlitchKind::FalseMemory => {
            let memory = content.pick(ContentCategory::FalseMemory, rng)?;
            let index = rng.pick_index(entities.len());
            if let Some(entity) = entities.get_mut(index) {
                entity.add_false_memory(memory.clone());
                planted_memory = Some(memory);
            }
        }
        GlitchKind::Teleportation => {
            for entity in entities.iter_mut() {
                entity.add_false_memory(TELEPORT_MEMORY);
            }
        }
        GlitchKind::Narrative => {}
    }

    info!(
        year,
        kind = ?glitch.kind,
        glitch = %glitch.description,
        "Glitch struck"
    );

    Ok(GlitchRecord {
        year,
        glitch,
        planted_memory,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ark_agents::seed_cast;
    use ark_world::{FixedEntropy, StoryContent};

    use super::*;

    fn glitch(kind: GlitchKind) -> Glitch {
        Glitch {
            kind,
            description: format!("{kind:?}"),
        }
    }

    #[test]
    fn year_reset_only_moves_the_calendar() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::midpoint();
        let mut calendar = 2973;
        let mut entities = seed_cast();
        let cast = entities.clone();

        let record = apply_glitch(
            glitch(GlitchKind::YearReset),
            &mut calendar,
            &mut entities,
            &content,
            &mut rng,
        )
        .unwrap();

        assert_eq!(record.year, 2973);
        assert_eq!(calendar, YEAR_RESET_TARGET);
        assert_eq!(entities, cast);
    }

    #[test]
    fn false_memory_goes_to_one_entity() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::midpoint();
        let mut calendar = 2972;
        let mut entities = seed_cast();

        let record = apply_glitch(
            glitch(GlitchKind::FalseMemory),
            &mut calendar,
            &mut entities,
            &content,
            &mut rng,
        )
        .unwrap();

        let planted = record.planted_memory.unwrap();
        assert_eq!(entities[0].glitch_memories(), &[planted]);
        assert!(entities[1].glitch_memories().is_empty());
        assert_eq!(calendar, 2972);
    }

    #[test]
    fn teleportation_reaches_every_entity() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::midpoint();
        let mut calendar = 2972;
        let mut entities = ark_agents::child_cast(ark_types::LayerId(1), 1);

        apply_glitch(
            glitch(GlitchKind::Teleportation),
            &mut calendar,
            &mut entities,
            &content,
            &mut rng,
        )
        .unwrap();

        for entity in &entities {
            assert_eq!(entity.glitch_memories(), &[TELEPORT_MEMORY.to_owned()]);
        }
    }

    #[test]
    fn narrative_glitch_changes_nothing() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::midpoint();
        let mut calendar = 2980;
        let mut entities = seed_cast();
        let cast = entities.clone();

        let record = apply_glitch(
            glitch(GlitchKind::Narrative),
            &mut calendar,
            &mut entities,
            &content,
            &mut rng,
        )
        .unwrap();

        assert_eq!(calendar, 2980);
        assert_eq!(entities, cast);
        assert_eq!(record.year, 2980);
        assert_eq!(record.planted_memory, None);
    }

    #[test]
    fn false_memory_in_an_empty_layer_plants_nothing() {
        let content = StoryContent::builtin();
        let mut rng = FixedEntropy::midpoint();
        let mut calendar = 2972;

        let record = apply_glitch(
            glitch(GlitchKind::FalseMemory),
            &mut calendar,
            &mut [],
            &content,
            &mut rng,
        )
        .unwrap();
        assert_eq!(record.planted_memory, None);
    }
}
