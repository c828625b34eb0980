//! Handler-facing views over a world's locked state.
//!
//! A context borrows the world's state for the duration of one handler
//! invocation, so every read and write a handler performs is serialized
//! with placements on the same world.

use basalt_registry::{BlockProps, blocks};
use basalt_utils::{BlockId, BlockPos};

use crate::behavior::{BehaviorTable, ChangeResult};
use crate::player::Player;
use crate::world::WorldState;

use super::deferred::{DeferredOp, NO_OPS};

/// View handed to physics handlers.
pub struct PhysicsContext<'a> {
    pub(crate) state: &'a mut WorldState,
    pub(crate) behaviors: &'a BehaviorTable,
    pub(crate) level: u8,
    pub(crate) lava_spread_delay: u8,
}

impl PhysicsContext<'_> {
    /// The world's current physics level.
    #[must_use]
    pub fn physics_level(&self) -> u8 {
        self.level
    }

    /// Evaluations a lava cell waits between spread steps.
    #[must_use]
    pub fn lava_spread_delay(&self) -> u8 {
        self.lava_spread_delay
    }

    /// Converts a flat index back to a position.
    #[must_use]
    pub fn pos_of(&self, index: u32) -> BlockPos {
        self.state.grid.pos_of(index)
    }

    /// Reads the block at a flat index.
    #[must_use]
    pub fn block_at(&self, index: u32) -> BlockId {
        self.state.grid.block_at(index)
    }

    /// Resolves a position to its index and current block, or `None` when
    /// out of bounds (edges of the world simply end the spread).
    #[must_use]
    pub fn get_indexed(&self, pos: BlockPos) -> Option<(u32, BlockId)> {
        let index = self.state.grid.index(pos).ok()?;
        Some((index, self.state.grid.block_at(index)))
    }

    /// Static properties of a block type, from this world's table.
    #[must_use]
    pub fn props(&self, block: BlockId) -> BlockProps {
        self.behaviors.props(block)
    }

    /// Rolls the world-local percentage die: true with `chance`/100.
    pub fn roll_percent(&mut self, chance: u8) -> bool {
        self.state.rand.roll_percent(chance)
    }

    /// Marks a cell for re-evaluation on a later tick (idempotent).
    pub fn add_check(&mut self, index: u32) {
        self.state.checks.enqueue(index);
    }

    /// Replaces a block and runs the queue hook.
    ///
    /// If the new block participates in physics its cell is (re-)queued;
    /// otherwise any stale entry for the cell is dropped.
    pub fn queue_update(&mut self, index: u32, block: BlockId) {
        self.queue_update_with(index, block, NO_OPS);
    }

    /// Replaces a block and arms the cell's entry with deferred operations.
    pub fn queue_update_with(&mut self, index: u32, block: BlockId, ops: [DeferredOp; 2]) {
        let prev = self.state.grid.set_index(index, block);
        if ops != NO_OPS || self.behaviors.has_physics(block) {
            self.state.checks.enqueue_with(index, ops);
        } else {
            self.state.checks.remove(index);
        }
        // A vanished sponge frees the liquids it was holding back.
        if prev == blocks::SPONGE && block != blocks::SPONGE {
            let pos = self.pos_of(index);
            super::sponge::on_removed(self, pos, true);
        }
    }
}

/// View handed to place handlers.
pub struct PlaceContext<'a> {
    /// Mutation surface shared with physics handlers.
    pub physics: PhysicsContext<'a>,
    /// The placing player.
    pub player: &'a Player,
    /// Target position.
    pub pos: BlockPos,
    /// Target flat index.
    pub index: u32,
    /// The block the player asked to place.
    pub block: BlockId,
}

impl PlaceContext<'_> {
    /// Writes `block` at the target cell through the queue hook.
    ///
    /// Placing the block that is already there reports `Invalid` so the
    /// caller can revert the client's prediction without a budget charge.
    pub fn commit(&mut self, block: BlockId) -> ChangeResult {
        if self.physics.block_at(self.index) == block {
            return ChangeResult::Invalid;
        }
        self.physics.queue_update(self.index, block);
        ChangeResult::Applied
    }
}
