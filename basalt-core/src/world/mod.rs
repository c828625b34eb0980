//! The `World`: one voxel grid with its own simulation state.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use basalt_registry::blocks;
use basalt_utils::{BlockId, BlockPos, PhysRandom};

use crate::behavior::{BehaviorTable, ChangeResult};
use crate::config::WorldSettings;
use crate::error::WorldError;
use crate::events::{BlockChangeGuard, GuardId, GuardVerdict};
use crate::physics::context::{PhysicsContext, PlaceContext};
use crate::physics::{MAX_PHYSICS_LEVEL, deferred};
use crate::player::Player;

mod grid;

pub use grid::Grid;

/// The mutable simulation state of a world, guarded by one lock so the tick
/// loop and player placements serialize.
pub struct WorldState {
    pub(crate) grid: Grid,
    pub(crate) checks: crate::physics::CheckQueue,
    pub(crate) rand: PhysRandom,
}

/// One voxel world: fixed-size grid, behavior table, pending-check queue,
/// and a physics level gating the scheduler.
///
/// Different worlds tick independently; everything inside one world shares
/// its state lock.
pub struct World {
    name: String,
    settings: WorldSettings,
    state: Mutex<WorldState>,
    behaviors: RwLock<BehaviorTable>,
    physics_level: AtomicU8,
    guards: RwLock<Vec<(GuardId, BlockChangeGuard)>>,
    next_guard: AtomicU64,
    players: RwLock<FxHashMap<Uuid, Arc<Player>>>,
    ticks: AtomicU64,
}

impl World {
    /// Creates a world with an air-filled grid and the default behavior
    /// table, at physics level 1.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        width: u16,
        height: u16,
        length: u16,
        settings: WorldSettings,
    ) -> Self {
        let rand = settings
            .seed
            .map_or_else(PhysRandom::from_entropy, PhysRandom::from_seed);
        Self {
            name: name.into(),
            settings,
            state: Mutex::new(WorldState {
                grid: Grid::new(width, height, length),
                checks: crate::physics::CheckQueue::new(),
                rand,
            }),
            behaviors: RwLock::new(BehaviorTable::with_defaults()),
            physics_level: AtomicU8::new(1),
            guards: RwLock::new(Vec::new()),
            next_guard: AtomicU64::new(0),
            players: RwLock::new(FxHashMap::default()),
            ticks: AtomicU64::new(0),
        }
    }

    /// World name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid dimensions as (width, height, length).
    #[must_use]
    pub fn dims(&self) -> (u16, u16, u16) {
        let state = self.state.lock();
        (
            state.grid.width(),
            state.grid.height(),
            state.grid.length(),
        )
    }

    /// Current physics level.
    #[must_use]
    pub fn physics_level(&self) -> u8 {
        self.physics_level.load(Ordering::Relaxed)
    }

    /// Sets the physics level, clamping above [`MAX_PHYSICS_LEVEL`].
    pub fn set_physics_level(&self, level: u8) {
        let clamped = level.min(MAX_PHYSICS_LEVEL);
        if clamped != level {
            log::debug!("world \"{}\": physics level {level} clamped to {clamped}", self.name);
        }
        self.physics_level.store(clamped, Ordering::Relaxed);
    }

    /// The behavior table lock, for override layers.
    #[must_use]
    pub fn behaviors(&self) -> &RwLock<BehaviorTable> {
        &self.behaviors
    }

    /// Reads a block.
    pub fn get_block(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        self.state.lock().grid.get(pos)
    }

    /// Writes a block directly, running the queue hook but no guards or
    /// place handlers. This is the path world generation, persistence and
    /// game controllers use.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) -> Result<BlockId, WorldError> {
        let behaviors = self.behaviors.read();
        let mut state = self.state.lock();
        let index = state.grid.index(pos)?;
        let mut ctx = PhysicsContext {
            state: &mut state,
            behaviors: &behaviors,
            level: self.physics_level(),
            lava_spread_delay: self.settings.lava_spread_delay,
        };
        let prev = ctx.block_at(index);
        ctx.queue_update(index, block);
        Ok(prev)
    }

    /// The player placement path.
    ///
    /// Runs the guard chain, then the place handler registered for the
    /// block (or a plain write). Anything but [`ChangeResult::Applied`]
    /// means the grid did not change and the caller should revert the
    /// client's prediction.
    pub fn change_block(&self, player: &Player, pos: BlockPos, block: BlockId) -> ChangeResult {
        for (_, guard) in self.guards.read().iter() {
            if guard(player, pos, block) == GuardVerdict::Deny {
                return ChangeResult::Invalid;
            }
        }

        let behaviors = self.behaviors.read();
        let mut state = self.state.lock();
        let Ok(index) = state.grid.index(pos) else {
            return ChangeResult::Invalid;
        };

        let handler = behaviors.place_handler(block);
        let mut ctx = PlaceContext {
            physics: PhysicsContext {
                state: &mut state,
                behaviors: &behaviors,
                level: self.physics_level(),
                lava_spread_delay: self.settings.lava_spread_delay,
            },
            player,
            pos,
            index,
            block,
        };
        match handler {
            Some(handler) => handler(&mut ctx),
            None => ctx.commit(block),
        }
    }

    /// Marks a cell for re-evaluation (idempotent).
    pub fn enqueue_check(&self, pos: BlockPos) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        let index = state.grid.index(pos)?;
        state.checks.enqueue(index);
        Ok(())
    }

    /// Number of queued pending checks.
    #[must_use]
    pub fn pending_checks(&self) -> usize {
        self.state.lock().checks.len()
    }

    /// True if the cell currently has a queued check.
    pub fn has_pending_check(&self, pos: BlockPos) -> Result<bool, WorldError> {
        let state = self.state.lock();
        let index = state.grid.index(pos)?;
        Ok(state.checks.contains(index))
    }

    /// Runs one physics tick: drains a bounded batch of due entries and
    /// dispatches each to the handler of its cell's *current* block.
    ///
    /// At physics level 0 this is a no-op. A handler that panics loses its
    /// entry but never the tick loop.
    pub fn tick(&self) {
        let level = self.physics_level();
        if level == 0 {
            return;
        }

        let behaviors = self.behaviors.read();
        let mut state = self.state.lock();

        let budget = state.checks.len().min(self.settings.max_checks_per_tick);
        let mut survivors = Vec::new();

        for _ in 0..budget {
            let Some(mut entry) = state.checks.pop_front() else {
                break;
            };
            let block = state.grid.block_at(entry.index);

            if let Some(handler) = behaviors.physics_handler(block) {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    let mut ctx = PhysicsContext {
                        state: &mut state,
                        behaviors: &behaviors,
                        level,
                        lava_spread_delay: self.settings.lava_spread_delay,
                    };
                    handler(&mut ctx, &mut entry);
                }));
                if outcome.is_err() {
                    log::error!(
                        "world \"{}\": physics handler for {} panicked; dropping the entry",
                        self.name,
                        blocks::name(block),
                    );
                    entry.remove_from_checks();
                }
            } else if entry.has_ops() {
                let mut ctx = PhysicsContext {
                    state: &mut state,
                    behaviors: &behaviors,
                    level,
                    lava_spread_delay: self.settings.lava_spread_delay,
                };
                deferred::run(&mut ctx, &mut entry);
            } else {
                // Block no longer participates in physics.
                entry.remove_from_checks();
            }

            if entry.is_removed() {
                state.checks.forget(entry.index);
            } else {
                survivors.push(entry);
            }
        }

        state.checks.requeue_front(survivors);
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Ticks run so far (while the level was non-zero).
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Copies the full block array out for the persistence layer.
    #[must_use]
    pub fn export_blocks(&self) -> Vec<BlockId> {
        self.state.lock().grid.export_blocks()
    }

    /// Replaces the full block array from the persistence layer. Pending
    /// checks are discarded; imported cells re-enter simulation when
    /// something disturbs them.
    pub fn import_blocks(&self, incoming: &[BlockId]) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        state.grid.import_blocks(incoming)?;
        state.checks.clear();
        Ok(())
    }

    /// Installs a block-change guard, returning its removal token.
    pub fn add_guard(&self, guard: BlockChangeGuard) -> GuardId {
        let id = GuardId(self.next_guard.fetch_add(1, Ordering::Relaxed));
        self.guards.write().push((id, guard));
        id
    }

    /// Removes a previously installed guard.
    pub fn remove_guard(&self, id: GuardId) {
        self.guards.write().retain(|(gid, _)| *gid != id);
    }

    /// Registers a player on this world.
    pub fn add_player(&self, player: Arc<Player>) {
        self.players.write().insert(player.id, player);
    }

    /// Removes a player from this world.
    pub fn remove_player(&self, id: &Uuid) {
        self.players.write().remove(id);
    }

    /// Looks up a player by id.
    #[must_use]
    pub fn player(&self, id: &Uuid) -> Option<Arc<Player>> {
        self.players.read().get(id).cloned()
    }

    /// Discards all pending checks. Called on teardown before the world is
    /// released, so no dangling tick references a freed grid.
    pub fn shutdown(&self) {
        self.state.lock().checks.clear();
        log::info!("world \"{}\" shut down", self.name);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::behavior::{BehaviorEntry, PhysicsHandler};
    use crate::physics::PendingCheck;

    fn test_world() -> World {
        let settings = WorldSettings {
            seed: Some(1234),
            ..WorldSettings::default()
        };
        World::new("test", 8, 8, 8, settings)
    }

    fn fast_lava_world() -> World {
        let settings = WorldSettings {
            seed: Some(1234),
            lava_spread_delay: 0,
            ..WorldSettings::default()
        };
        World::new("test", 8, 8, 8, settings)
    }

    #[test]
    fn level_zero_never_drains() {
        let world = test_world();
        world.set_physics_level(0);
        world
            .set_block(BlockPos::new(4, 4, 4), blocks::WATER)
            .expect("in bounds");
        let before = world.export_blocks();

        for _ in 0..10 {
            world.tick();
        }

        assert_eq!(world.export_blocks(), before);
        assert_eq!(world.pending_checks(), 1);
    }

    #[test]
    fn duplicate_enqueue_evaluates_once() {
        let world = test_world();
        let pos = BlockPos::new(4, 4, 4);
        world.set_block(pos, blocks::WATER).expect("in bounds");
        world.enqueue_check(pos).expect("in bounds");
        assert_eq!(world.pending_checks(), 1);
    }

    #[test]
    fn lone_water_source_claims_five_neighbors() {
        let world = test_world();
        let center = BlockPos::new(4, 4, 4);
        world.set_block(center, blocks::WATER).expect("in bounds");

        world.tick();

        for neighbor in [
            center.offset(1, 0, 0),
            center.offset(-1, 0, 0),
            center.offset(0, 0, 1),
            center.offset(0, 0, -1),
            center.offset(0, -1, 0),
        ] {
            assert_eq!(world.get_block(neighbor), Ok(blocks::WATER));
        }
        // Upward flood is off by default.
        assert_eq!(world.get_block(center.offset(0, 1, 0)), Ok(blocks::AIR));
        // The source asked to be removed from checks.
        assert_eq!(world.has_pending_check(center), Ok(false));
        assert_eq!(world.get_block(center), Ok(blocks::WATER));
    }

    #[test]
    fn water_spread_respects_world_edges() {
        let world = test_world();
        let corner = BlockPos::new(0, 0, 0);
        world.set_block(corner, blocks::WATER).expect("in bounds");

        world.tick();

        assert_eq!(world.get_block(BlockPos::new(1, 0, 0)), Ok(blocks::WATER));
        assert_eq!(world.get_block(BlockPos::new(0, 0, 1)), Ok(blocks::WATER));
    }

    #[test]
    fn lava_turns_adjacent_water_into_stone() {
        let world = fast_lava_world();
        let lava = BlockPos::new(3, 3, 3);
        let water = lava.offset(1, 0, 0);
        world.set_block(lava, blocks::LAVA).expect("in bounds");
        world.set_block(water, blocks::WATER).expect("in bounds");

        world.tick();

        assert_eq!(world.get_block(water), Ok(blocks::STONE));
        assert_eq!(world.get_block(lava), Ok(blocks::LAVA));
    }

    #[test]
    fn lava_delay_gates_spread() {
        let settings = WorldSettings {
            seed: Some(7),
            lava_spread_delay: 2,
            ..WorldSettings::default()
        };
        let world = World::new("test", 8, 8, 8, settings);
        let lava = BlockPos::new(3, 3, 3);
        world.set_block(lava, blocks::LAVA).expect("in bounds");

        // Two evaluations only feed the counter.
        world.tick();
        world.tick();
        assert_eq!(world.get_block(lava.offset(1, 0, 0)), Ok(blocks::AIR));

        world.tick();
        assert_eq!(world.get_block(lava.offset(1, 0, 0)), Ok(blocks::LAVA));
    }

    #[test]
    fn fast_lava_ignores_the_delay_gate() {
        let settings = WorldSettings {
            seed: Some(7),
            lava_spread_delay: 50,
            ..WorldSettings::default()
        };
        let world = World::new("test", 8, 8, 8, settings);
        let lava = BlockPos::new(3, 3, 3);
        world.set_block(lava, blocks::FAST_LAVA).expect("in bounds");

        world.tick();
        assert_eq!(
            world.get_block(lava.offset(1, 0, 0)),
            Ok(blocks::FAST_LAVA)
        );
    }

    #[test]
    fn sand_next_to_lava_vitrifies_at_advanced_physics() {
        let world = fast_lava_world();
        world.set_physics_level(2);
        let lava = BlockPos::new(3, 3, 3);
        let sand = lava.offset(1, 0, 0);
        world.set_block(lava, blocks::LAVA).expect("in bounds");
        world.set_block(sand, blocks::SAND).expect("in bounds");

        world.tick();

        assert_eq!(world.get_block(sand), Ok(blocks::GLASS));
    }

    #[test]
    fn handler_lookup_uses_the_current_block() {
        let world = test_world();
        let pos = BlockPos::new(4, 4, 4);
        world.set_block(pos, blocks::WATER).expect("in bounds");
        // The block changes underneath the queued entry.
        world.set_block(pos, blocks::FAST_LAVA).expect("in bounds");

        world.tick();

        // The entry dispatched to the lava handler, not the water one.
        assert_eq!(
            world.get_block(pos.offset(1, 0, 0)),
            Ok(blocks::FAST_LAVA)
        );
    }

    #[test]
    fn a_block_losing_its_handler_drops_its_entry() {
        let world = test_world();
        let pos = BlockPos::new(4, 4, 4);
        world.set_block(pos, blocks::WATER).expect("in bounds");
        world.set_block(pos, blocks::STONE).expect("in bounds");

        world.tick();

        assert_eq!(world.get_block(pos.offset(1, 0, 0)), Ok(blocks::AIR));
        assert_eq!(world.pending_checks(), 0);
    }

    #[test]
    fn a_panicking_handler_cannot_halt_the_tick() {
        let world = test_world();
        let bad: PhysicsHandler =
            Arc::new(|_ctx: &mut PhysicsContext<'_>, _entry: &mut PendingCheck| {
                panic!("malformed entry");
            });
        world.behaviors().write().install_overrides(vec![(
            blocks::STONE,
            BehaviorEntry {
                place: None,
                physics: Some(bad),
            },
        )]);

        let stone = BlockPos::new(2, 2, 2);
        let water = BlockPos::new(5, 5, 5);
        world.set_block(stone, blocks::STONE).expect("in bounds");
        world.enqueue_check(stone).expect("in bounds");
        world.set_block(water, blocks::WATER).expect("in bounds");

        world.tick();

        // The bad entry was dropped, the water still spread.
        assert_eq!(world.has_pending_check(stone), Ok(false));
        assert_eq!(world.get_block(water.offset(1, 0, 0)), Ok(blocks::WATER));
    }

    #[test]
    fn placement_reports_the_tri_state() {
        let world = test_world();
        let player = Player::new("op_hannah");

        assert_eq!(
            world.change_block(&player, BlockPos::new(99, 0, 0), blocks::STONE),
            ChangeResult::Invalid
        );

        let pos = BlockPos::new(1, 1, 1);
        assert_eq!(
            world.change_block(&player, pos, blocks::STONE),
            ChangeResult::Applied
        );
        // Placing what is already there changes nothing.
        assert_eq!(
            world.change_block(&player, pos, blocks::STONE),
            ChangeResult::Invalid
        );
    }

    #[test]
    fn a_guard_vetoes_placement() {
        let world = test_world();
        let player = Player::new("op_hannah");
        let pos = BlockPos::new(1, 1, 1);

        let id = world.add_guard(Arc::new(|_, _, _| GuardVerdict::Deny));
        assert_eq!(
            world.change_block(&player, pos, blocks::STONE),
            ChangeResult::Invalid
        );
        assert_eq!(world.get_block(pos), Ok(blocks::AIR));

        world.remove_guard(id);
        assert_eq!(
            world.change_block(&player, pos, blocks::STONE),
            ChangeResult::Applied
        );
    }

    #[test]
    fn placing_a_sponge_dries_nearby_water() {
        let world = test_world();
        let player = Player::new("op_hannah");
        let sponge = BlockPos::new(4, 4, 4);
        let near = sponge.offset(2, 0, 0);
        let far = sponge.offset(3, 0, 0);
        world.set_block(near, blocks::STILL_WATER).expect("in bounds");
        world.set_block(far, blocks::STILL_WATER).expect("in bounds");

        assert_eq!(
            world.change_block(&player, sponge, blocks::SPONGE),
            ChangeResult::Applied
        );
        assert_eq!(world.get_block(near), Ok(blocks::AIR));
        assert_eq!(world.get_block(far), Ok(blocks::STILL_WATER));
    }

    #[test]
    fn water_flowing_against_a_sponge_stops_short() {
        let world = test_world();
        let sponge = BlockPos::new(4, 4, 4);
        world.set_block(sponge, blocks::SPONGE).expect("in bounds");
        // Just outside the dry zone.
        let source = sponge.offset(3, 0, 0);
        world.set_block(source, blocks::WATER).expect("in bounds");

        world.tick();

        // The cell toward the sponge is inside the dry zone and stays dry.
        assert_eq!(world.get_block(sponge.offset(2, 0, 0)), Ok(blocks::AIR));
        // Away from the sponge the water still spreads.
        assert_eq!(world.get_block(source.offset(1, 0, 0)), Ok(blocks::WATER));
    }

    #[test]
    fn removing_a_sponge_lets_water_reclaim_the_area() {
        let world = test_world();
        let sponge = BlockPos::new(4, 4, 4);
        world.set_block(sponge, blocks::SPONGE).expect("in bounds");
        let source = sponge.offset(3, 0, 0);
        world.set_block(source, blocks::WATER).expect("in bounds");

        world.tick();
        let dried = sponge.offset(2, 0, 0);
        assert_eq!(world.get_block(dried), Ok(blocks::AIR));

        world.set_block(sponge, blocks::AIR).expect("in bounds");
        world.tick();
        assert_eq!(world.get_block(dried), Ok(blocks::WATER));
    }

    #[test]
    fn sand_falls_until_it_rests() {
        let world = test_world();
        world
            .set_block(BlockPos::new(4, 0, 4), blocks::STONE)
            .expect("in bounds");
        let top = BlockPos::new(4, 3, 4);
        world.set_block(top, blocks::SAND).expect("in bounds");

        for _ in 0..4 {
            world.tick();
        }

        assert_eq!(world.get_block(top), Ok(blocks::AIR));
        assert_eq!(world.get_block(BlockPos::new(4, 1, 4)), Ok(blocks::SAND));
        assert_eq!(world.pending_checks(), 0);
    }

    #[test]
    fn export_import_roundtrip_discards_checks() {
        let world = test_world();
        world
            .set_block(BlockPos::new(2, 2, 2), blocks::WATER)
            .expect("in bounds");
        let snapshot = world.export_blocks();

        let restored = test_world();
        restored.import_blocks(&snapshot).expect("same volume");
        assert_eq!(restored.export_blocks(), snapshot);
        assert_eq!(restored.pending_checks(), 0);
    }

    #[test]
    fn physics_level_clamps_at_the_boundary() {
        let world = test_world();
        world.set_physics_level(250);
        assert_eq!(world.physics_level(), MAX_PHYSICS_LEVEL);
    }
}
