//! Flood survival.
//!
//! While a round runs, the map slowly drowns in lava (or water): the mode
//! overrides the behavior table entries for liquids, sponges and doors, and
//! every player fights the flood with a limited block budget. Ending the
//! round restores the saved entries verbatim, so rounds nest cleanly with
//! any other override layer.

mod config;
mod physics;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use basalt_core::World;
use basalt_core::WorldError;
use basalt_core::events::{GuardId, GuardVerdict};
use basalt_core::player::Player;
use basalt_registry::blocks;
use basalt_utils::{BlockId, BlockPos};

pub use config::FloodConfig;

/// How long a dead player waits before respawning as a spectator.
const DEATH_COOLDOWN: Duration = Duration::from_secs(30);

/// Flood aggressiveness, from quiet to map-eating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Deserialize)]
pub enum FloodTier {
    /// The flood spreads but consumes nothing.
    #[default]
    Calm,
    /// Blocks start to smolder.
    Disturbed,
    /// Fragile blocks are consumed outright.
    Furious,
    /// Almost everything burns.
    Wild,
}

impl FloodTier {
    /// Chance (per cent) that a non-exempt block starts to smolder.
    #[must_use]
    pub fn burn_chance(self) -> u8 {
        match self {
            Self::Disturbed => 50,
            Self::Furious => 70,
            Self::Wild => 85,
            Self::Calm => 100,
        }
    }

    /// Evaluations a smoldering block holds before its dissipate roll.
    #[must_use]
    pub fn destroy_delay(self) -> u8 {
        match self {
            Self::Disturbed => 200,
            Self::Furious => 100,
            Self::Wild => 50,
            Self::Calm => 10,
        }
    }

    /// Chance (per cent) that a smoldering block burns away per attempt.
    #[must_use]
    pub fn dissipate_chance(self) -> u8 {
        match self {
            Self::Disturbed => 50,
            Self::Furious => 65,
            Self::Wild => 80,
            Self::Calm => 100,
        }
    }
}

/// A protected box around the players' refuge; the spread consumes its
/// ticks there but never mutates the grid.
#[derive(Debug, Clone, Copy)]
pub struct SafeZone {
    origin: BlockPos,
    radius: i32,
}

impl SafeZone {
    /// Creates a zone centered on `origin`.
    #[must_use]
    pub const fn new(origin: BlockPos, radius: i32) -> Self {
        Self { origin, radius }
    }

    /// Chebyshev-distance membership test.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        let dx = (pos.0.x - self.origin.0.x).abs();
        let dy = (pos.0.y - self.origin.0.y).abs();
        let dz = (pos.0.z - self.origin.0.z).abs();
        dx <= self.radius && dy <= self.radius && dz <= self.radius
    }
}

/// One player's standing in the current round.
#[derive(Debug, Clone)]
pub struct PlayerRound {
    /// Lives left before spectating.
    pub lives: i32,
    /// Out of the round.
    pub dead: bool,
    /// Sponges left to place.
    pub sponges_left: i32,
    /// Water blocks left to place.
    pub water_left: i32,
    /// Doors left to place.
    pub doors_left: i32,
}

impl PlayerRound {
    fn new(config: &FloodConfig) -> Self {
        Self {
            lives: config.start_lives,
            dead: false,
            sponges_left: config.sponges,
            water_left: config.water_blocks,
            doors_left: config.doors,
        }
    }
}

/// Round state shared between the controller and the installed handlers.
pub(crate) struct RoundCore {
    pub(crate) config: FloodConfig,
    tier: RwLock<FloodTier>,
    flood_up: AtomicBool,
    safe_zone: RwLock<Option<SafeZone>>,
    pub(crate) players: Mutex<FxHashMap<Uuid, PlayerRound>>,
}

impl RoundCore {
    fn new(config: FloodConfig) -> Self {
        let flood_up = AtomicBool::new(config.flood_upward);
        Self {
            config,
            tier: RwLock::new(FloodTier::Calm),
            flood_up,
            safe_zone: RwLock::new(None),
            players: Mutex::new(FxHashMap::default()),
        }
    }

    pub(crate) fn tier(&self) -> FloodTier {
        *self.tier.read()
    }

    pub(crate) fn flood_up(&self) -> bool {
        self.flood_up.load(Ordering::Relaxed)
    }

    pub(crate) fn in_safe_zone(&self, pos: BlockPos) -> bool {
        self.safe_zone.read().is_some_and(|zone| zone.contains(pos))
    }

    /// Placement protection around the flood's own spawn point.
    pub(crate) fn near_flood_spawn(&self, pos: BlockPos) -> bool {
        let origin = self.config.flood_pos();
        let radius = self.config.spawn_protection_radius;
        let dx = (pos.0.x - origin.0.x).abs();
        let dy = (pos.0.y - origin.0.y).abs();
        let dz = (pos.0.z - origin.0.z).abs();
        dx <= radius && dy <= radius && dz <= radius
    }

    pub(crate) fn fresh_round(&self) -> PlayerRound {
        PlayerRound::new(&self.config)
    }
}

/// The flood-survival round controller for one world.
pub struct FloodGame {
    world: Arc<World>,
    core: Arc<RoundCore>,
    running: bool,
    guard: Option<GuardId>,
}

impl FloodGame {
    /// Creates a controller; nothing is installed until [`FloodGame::start`].
    #[must_use]
    pub fn new(world: Arc<World>, config: FloodConfig) -> Self {
        let core = Arc::new(RoundCore::new(config));
        Self {
            world,
            core,
            running: false,
            guard: None,
        }
    }

    /// True while a round is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The block this round floods with.
    #[must_use]
    pub fn flood_block(&self) -> BlockId {
        if self.core.config.water_round {
            blocks::DEADLY_WATER
        } else {
            blocks::DEADLY_LAVA
        }
    }

    /// Starts a round: snapshots and overrides the behavior table entries
    /// for the mode's block types and arms spawn protection.
    pub fn start(&mut self) -> Result<(), WorldError> {
        if self.running {
            log::warn!("flood round start while already running");
            return Err(WorldError::InvalidLifecycle {
                action: "flood round start",
            });
        }

        *self.core.tier.write() = FloodTier::Calm;
        *self.core.safe_zone.write() = self
            .core
            .config
            .safe_pos()
            .map(|origin| SafeZone::new(origin, self.core.config.safe_zone_radius));
        if self.core.config.spawn_protection {
            self.guard = Some(self.install_spawn_guard());
        }

        self.world
            .behaviors()
            .write()
            .install_overrides(physics::build_overrides(&self.core));

        self.running = true;
        log::info!(
            "flood round started on \"{}\" ({})",
            self.world.name(),
            blocks::name(self.flood_block())
        );
        Ok(())
    }

    /// Ends the round: restores the saved behavior entries verbatim and
    /// discards all round state.
    pub fn end(&mut self) -> Result<(), WorldError> {
        if !self.running {
            log::warn!("flood round end without a running round");
            return Err(WorldError::InvalidLifecycle {
                action: "flood round end",
            });
        }

        self.world.behaviors().write().restore_overrides()?;
        if let Some(guard) = self.guard.take() {
            self.world.remove_guard(guard);
        }
        *self.core.safe_zone.write() = None;
        self.core.players.lock().clear();
        self.running = false;
        log::info!("flood round ended on \"{}\"", self.world.name());
        Ok(())
    }

    /// Escalates (or calms) the flood.
    pub fn set_flood_tier(&self, tier: FloodTier) -> Result<(), WorldError> {
        if !self.running {
            log::warn!("flood tier set without a running round");
            return Err(WorldError::InvalidLifecycle {
                action: "flood tier change",
            });
        }
        *self.core.tier.write() = tier;
        Ok(())
    }

    /// Current flood tier.
    #[must_use]
    pub fn flood_tier(&self) -> FloodTier {
        self.core.tier()
    }

    /// Moves or resizes the protected region.
    pub fn set_safe_zone(&self, origin: BlockPos, radius: i32) -> Result<(), WorldError> {
        if !self.running {
            log::warn!("safe zone set without a running round");
            return Err(WorldError::InvalidLifecycle {
                action: "safe zone change",
            });
        }
        *self.core.safe_zone.write() = Some(SafeZone::new(origin, radius));
        Ok(())
    }

    /// Toggles upward flooding mid-round.
    pub fn set_flood_upward(&self, upward: bool) {
        self.core.flood_up.store(upward, Ordering::Relaxed);
    }

    /// Enters a player into the round with fresh budgets.
    pub fn join(&self, player: &Player) {
        self.core
            .players
            .lock()
            .insert(player.id, self.core.fresh_round());
    }

    /// Reads a player's round standing.
    #[must_use]
    pub fn round_of(&self, player: &Player) -> Option<PlayerRound> {
        self.core.players.lock().get(&player.id).cloned()
    }

    /// Records a death: one life gone, a fixed respawn cooldown.
    ///
    /// Returns `None` for players already out of the round (their deaths
    /// are cancelled upstream).
    pub fn on_player_died(&self, player: &Player) -> Option<Duration> {
        let mut players = self.core.players.lock();
        let round = players
            .entry(player.id)
            .or_insert_with(|| self.core.fresh_round());
        if round.dead {
            return None;
        }
        round.lives -= 1;
        if round.lives <= 0 {
            round.dead = true;
            player.message("You are out of lives!");
        }
        Some(DEATH_COOLDOWN)
    }

    /// True once a player has run out of lives.
    #[must_use]
    pub fn is_player_dead(&self, player: &Player) -> bool {
        self.core
            .players
            .lock()
            .get(&player.id)
            .is_some_and(|round| round.dead)
    }

    /// Opens the flood: places the flood block at the configured origin.
    pub fn begin_flood(&self) -> Result<(), WorldError> {
        if !self.running {
            log::warn!("flood begun without a running round");
            return Err(WorldError::InvalidLifecycle {
                action: "flood begin",
            });
        }
        let origin = self.core.config.flood_pos();
        self.world.set_block(origin, self.flood_block())?;
        Ok(())
    }

    fn install_spawn_guard(&self) -> GuardId {
        let core = Arc::clone(&self.core);
        let flood_name = blocks::name(self.flood_block());
        self.world.add_guard(Arc::new(move |player, pos, _block| {
            if core.near_flood_spawn(pos) {
                player.message(format!(
                    "You can't place blocks so close to the {flood_name} spawn"
                ));
                GuardVerdict::Deny
            } else {
                GuardVerdict::Allow
            }
        }))
    }
}

impl Drop for FloodGame {
    fn drop(&mut self) {
        if self.running {
            // A dropped controller must not leave its overrides installed.
            let _ = self.end();
        }
    }
}

#[cfg(test)]
mod tests;
