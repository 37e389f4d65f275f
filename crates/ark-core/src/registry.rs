//! The ordered, capacity-bounded set of simulation layers.
//!
//! Layers are kept in creation order and never removed. A layer's position in
//! the registry is its id minus one, so lookups by id are constant time.

use ark_agents::{child_cast, seed_cast};
use ark_types::LayerId;
use ark_world::CollapseLimits;
use tracing::info;

use crate::layer::SimulationLayer;

/// Errors raised when spawning layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry already holds as many layers as the probe can host.
    #[error("maximum simulation capacity of {capacity} layers reached")]
    CapacityExceeded {
        /// The fixed capacity.
        capacity: u32,
    },

    /// The requested parent layer does not exist.
    #[error("unknown parent layer {0}")]
    UnknownParent(LayerId),

    /// The seed layer was already created.
    #[error("registry already holds a seed layer")]
    AlreadySeeded,
}

/// Every layer of a run, in creation order.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    layers: Vec<SimulationLayer>,
    capacity: u32,
    limits: CollapseLimits,
    cycle_count: u64,
}

impl LayerRegistry {
    /// An empty registry that will host at most `capacity` layers.
    pub const fn new(capacity: u32, limits: CollapseLimits) -> Self {
        Self {
            layers: Vec::new(),
            capacity,
            limits,
            cycle_count: 0,
        }
    }

    /// Create layer 1 with the seed cast.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadySeeded`] if any layer exists, or
    /// [`RegistryError::CapacityExceeded`] if the capacity is zero.
    pub fn seed(&mut self) -> Result<LayerId, RegistryError> {
        if !self.layers.is_empty() {
            return Err(RegistryError::AlreadySeeded);
        }
        self.ensure_room()?;
        let id = LayerId(1);
        self.layers
            .push(SimulationLayer::new(id, None, 0, self.limits, seed_cast()));
        info!(layer = %id, capacity = self.capacity, "Seed layer created");
        Ok(id)
    }

    /// Spawn a child of `parent` with a fresh seed climate and the child cast.
    ///
    /// The registry is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`] if the registry is full,
    /// or [`RegistryError::UnknownParent`] if `parent` does not exist.
    pub fn spawn_child(&mut self, parent: LayerId) -> Result<LayerId, RegistryError> {
        self.ensure_room()?;
        let parent_depth = self
            .get(parent)
            .map(SimulationLayer::depth)
            .ok_or(RegistryError::UnknownParent(parent))?;

        let id = self
            .layers
            .last()
            .map_or(LayerId(1), |layer| layer.id().next());
        let depth = parent_depth.saturating_add(1);
        self.layers.push(SimulationLayer::new(
            id,
            Some(parent),
            depth,
            self.limits,
            child_cast(parent, depth),
        ));
        info!(
            layer = %id,
            parent = %parent,
            depth,
            layers = self.layers.len(),
            capacity = self.capacity,
            "New Ark spawned"
        );
        Ok(id)
    }

    fn ensure_room(&self) -> Result<(), RegistryError> {
        let len = u32::try_from(self.layers.len()).unwrap_or(u32::MAX);
        if len >= self.capacity {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Look up a layer by id.
    pub fn get(&self, id: LayerId) -> Option<&SimulationLayer> {
        let index = usize::try_from(id.into_inner().checked_sub(1)?).ok()?;
        self.layers.get(index)
    }

    /// Look up a layer by id for mutation.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut SimulationLayer> {
        let index = usize::try_from(id.into_inner().checked_sub(1)?).ok()?;
        self.layers.get_mut(index)
    }

    /// Ids of every layer, in creation order.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(SimulationLayer::id).collect()
    }

    /// Every layer, in creation order.
    pub fn layers(&self) -> &[SimulationLayer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been created yet.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Maximum number of layers.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Collapse limits given to every new layer.
    pub const fn limits(&self) -> CollapseLimits {
        self.limits
    }

    /// Cycles started so far.
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Count the start of a new cycle and return its number.
    pub const fn begin_cycle(&mut self) -> u64 {
        self.cycle_count = self.cycle_count.saturating_add(1);
        self.cycle_count
    }
}
