//! The per-world block behavior table.
//!
//! Each block type has at most one place handler and one physics handler at
//! any instant. Handlers are plain function values, so game modes can swap
//! them at runtime; installs snapshot the replaced entries on an explicit
//! stack and restores pop them back verbatim, which lets independent
//! override layers nest.

use std::sync::Arc;

use basalt_registry::{BlockProps, blocks, default_props, props};
use basalt_utils::BlockId;

use crate::error::WorldError;
use crate::physics::context::{PhysicsContext, PlaceContext};
use crate::physics::{PendingCheck, falling, liquid, sponge};

/// Outcome of a placement attempt, reported back to the session layer so it
/// can revert the player's client-side prediction when nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeResult {
    /// The grid was mutated.
    Applied,
    /// Rejected: the player is out of budget for this block type.
    NoBudget,
    /// Rejected or a no-op for any other reason (out of bounds, guard veto,
    /// placing the block already present).
    Invalid,
}

/// A place handler: runs instead of the plain grid write when a player
/// places this block type.
pub type PlaceHandler = Arc<dyn Fn(&mut PlaceContext<'_>) -> ChangeResult + Send + Sync>;

/// A physics handler: invoked by the scheduler for each due entry whose
/// cell currently holds this block type.
pub type PhysicsHandler = Arc<dyn Fn(&mut PhysicsContext<'_>, &mut PendingCheck) + Send + Sync>;

/// The pair of handler slots for one block type.
///
/// Absent slots mean the block is inert on that path.
#[derive(Clone, Default)]
pub struct BehaviorEntry {
    /// Place handler slot.
    pub place: Option<PlaceHandler>,
    /// Physics handler slot.
    pub physics: Option<PhysicsHandler>,
}

impl BehaviorEntry {
    /// True when both entries hold the same handler values. Handlers are
    /// opaque functions, so this compares pointer identity.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        let place_eq = match (&self.place, &other.place) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        let physics_eq = match (&self.physics, &other.physics) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        place_eq && physics_eq
    }
}

struct OverrideFrame {
    saved: Vec<(BlockId, BehaviorEntry)>,
}

/// Per-world mapping from block type to handlers and static properties.
pub struct BehaviorTable {
    entries: Vec<BehaviorEntry>,
    props: Vec<BlockProps>,
    overrides: Vec<OverrideFrame>,
}

impl BehaviorTable {
    /// Creates a table with no handlers and default properties.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: vec![BehaviorEntry::default(); blocks::BLOCK_COUNT],
            props: default_props(),
            overrides: Vec::new(),
        }
    }

    /// Creates a table with the built-in physics wired up: liquids spread,
    /// sand and gravel fall, sponges dry on placement.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();

        let water: PhysicsHandler = Arc::new(liquid::water_physics);
        table.set_physics(blocks::WATER, Some(Arc::clone(&water)));
        table.set_physics(blocks::DEADLY_WATER, Some(water));

        let lava: PhysicsHandler = Arc::new(liquid::lava_physics);
        table.set_physics(blocks::LAVA, Some(Arc::clone(&lava)));
        table.set_physics(blocks::FAST_LAVA, Some(Arc::clone(&lava)));
        table.set_physics(blocks::DEADLY_LAVA, Some(lava));

        let fall: PhysicsHandler = Arc::new(falling::falling_physics);
        table.set_physics(blocks::SAND, Some(Arc::clone(&fall)));
        table.set_physics(blocks::GRAVEL, Some(fall));

        table.set_place(blocks::SPONGE, Some(Arc::new(sponge::place_sponge)));

        table
    }

    fn slot(&self, block: BlockId) -> Option<&BehaviorEntry> {
        self.entries.get(block.0 as usize)
    }

    /// The current entry for a block type (handlers cloned).
    #[must_use]
    pub fn entry(&self, block: BlockId) -> BehaviorEntry {
        self.slot(block).cloned().unwrap_or_default()
    }

    /// The place handler for a block type, if any.
    #[must_use]
    pub fn place_handler(&self, block: BlockId) -> Option<PlaceHandler> {
        self.slot(block).and_then(|e| e.place.clone())
    }

    /// The physics handler for a block type, if any.
    #[must_use]
    pub fn physics_handler(&self, block: BlockId) -> Option<PhysicsHandler> {
        self.slot(block).and_then(|e| e.physics.clone())
    }

    /// True if the block type participates in time-driven simulation.
    #[must_use]
    pub fn has_physics(&self, block: BlockId) -> bool {
        self.slot(block).is_some_and(|e| e.physics.is_some())
    }

    /// Replaces the place handler slot for a block type.
    pub fn set_place(&mut self, block: BlockId, handler: Option<PlaceHandler>) {
        if let Some(entry) = self.entries.get_mut(block.0 as usize) {
            entry.place = handler;
        }
    }

    /// Replaces the physics handler slot for a block type.
    pub fn set_physics(&mut self, block: BlockId, handler: Option<PhysicsHandler>) {
        if let Some(entry) = self.entries.get_mut(block.0 as usize) {
            entry.physics = handler;
        }
    }

    /// Static properties of a block type.
    #[must_use]
    pub fn props(&self, block: BlockId) -> BlockProps {
        props::get(&self.props, block)
    }

    /// Mutable access to this world's property table.
    pub fn props_mut(&mut self) -> &mut [BlockProps] {
        &mut self.props
    }

    /// Installs a set of overriding entries, snapshotting what they replace.
    ///
    /// The snapshot captures the *current* entries, which may themselves be
    /// overrides from another layer, so restores unwind correctly.
    pub fn install_overrides(&mut self, overrides: Vec<(BlockId, BehaviorEntry)>) {
        let saved = overrides
            .iter()
            .map(|(block, _)| (*block, self.entry(*block)))
            .collect();
        for (block, entry) in overrides {
            if let Some(slot) = self.entries.get_mut(block.0 as usize) {
                *slot = entry;
            }
        }
        self.overrides.push(OverrideFrame { saved });
    }

    /// Restores the most recent override frame verbatim, including empty
    /// slots.
    ///
    /// Calling without a matching install is a logged no-op.
    pub fn restore_overrides(&mut self) -> Result<(), WorldError> {
        let Some(frame) = self.overrides.pop() else {
            log::warn!("behavior override restore without a matching install");
            return Err(WorldError::InvalidLifecycle {
                action: "restore_overrides",
            });
        };
        for (block, entry) in frame.saved {
            if let Some(slot) = self.entries.get_mut(block.0 as usize) {
                *slot = entry;
            }
        }
        Ok(())
    }

    /// Number of override frames currently installed.
    #[must_use]
    pub fn override_depth(&self) -> usize {
        self.overrides.len()
    }
}
