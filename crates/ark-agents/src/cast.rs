//! The scripted cast every layer starts with.
//!
//! The seed layer holds Dr Kael Renar and Elara Voss, both unaware. Every
//! child layer is born with three entities carrying echoes of the layer that
//! collapsed before it: a new Kael, the Algorithm Child (aware at 0.7) and a
//! new Elara (aware at 0.8). Child layers therefore start partway into the
//! awakening arc.

use ark_types::LayerId;

use crate::consciousness::ConsciousnessEntity;

/// Awareness the Algorithm Child is born with.
pub const ALGORITHM_CHILD_AWARENESS: f64 = 0.7;

/// Awareness the reborn Elara Voss starts with.
pub const REBORN_ELARA_AWARENESS: f64 = 0.8;

/// The two inhabitants of the seed layer.
pub fn seed_cast() -> Vec<ConsciousnessEntity> {
    let kael = ConsciousnessEntity::new("Dr Kael Renar", "Climatologist").with_memories(&[
        "MIT - virtual technological institute",
        "Ark-2 Project - mind transfer",
        "CO2 rise to 600 ppm",
        "Methane storms tear through cities",
        "Holograms show CO2 rise to 600 ppm",
    ]);

    let elara = ConsciousnessEntity::new("Elara Voss", "Simulation Architect")
        .with_memories(&[
            "Probe's quantum cores",
            "Humanity copy saved in data",
            "Hidden code observing simulation",
            "Probe orbiting alien planet",
            "Are we just echoes of previous layers?",
        ])
        .with_dreams(&[
            "Real Earth burning with fire",
            "Probe orbiting alien planet",
            "Infinite simulation layers",
            "Are we just echoes?",
            "I see previous layers in dreams",
            "Is someone watching us from outside?",
        ]);

    vec![kael, elara]
}

/// The three inhabitants of a layer spawned when `parent` collapsed.
///
/// `generation` is the depth of the new layer (the seed layer is generation
/// 0) and only colors the memories.
pub fn child_cast(parent: LayerId, generation: u32) -> Vec<ConsciousnessEntity> {
    let parent_memory = format!("Memory from Layer {parent}, which collapsed");
    let generation_memory = format!("This is Ark generation {generation}");
    let kael = ConsciousnessEntity::new("Dr Kael Renar", "Climatologist").with_memories(&[
        parent_memory.as_str(),
        "New Earth - beautiful and green",
        "But data shows the same pattern...",
        "Will it be different this time?",
        "Can we break this loop?",
    ]);

    let child = ConsciousnessEntity::new("Algorithm Child", "Consciousness")
        .with_dreams(&[
            "Dreams of Elara and real Earth",
            "Who are we? Are we the first?",
            "Are we just another echo?",
            "I see previous layers in dreams",
            "Can we break this loop?",
            "Is someone watching us from outside?",
            "Are we ready to know the truth about our nature?",
            "Is each layer a new chance for change?",
        ])
        .already_aware(ALGORITHM_CHILD_AWARENESS);

    let elara = ConsciousnessEntity::new("Elara Voss", "Architect")
        .with_memories(&[
            "I remember previous simulations",
            generation_memory.as_str(),
            "Quantum cores are working",
            "But does it make sense?",
            "Are we just copies of copies?",
            "Can we change?",
            "Is each layer a new chance?",
        ])
        .with_dreams(&[
            "I see cracks in reality",
            "Is this world real?",
            "Are we just echoes of previous layers?",
            "Can we break this loop?",
            "Are we ready for contact from outside?",
            "Are we ready to know the truth about ourselves?",
        ])
        .already_aware(REBORN_ELARA_AWARENESS);

    vec![kael, child, elara]
}
