//! Pre-placement veto hooks.
//!
//! Game modes and moderation features install guards on a world; every
//! player placement runs the guard chain before any handler fires. A guard
//! that denies is expected to message the player itself.

use std::sync::Arc;

use basalt_utils::{BlockId, BlockPos};

use crate::player::Player;

/// A guard's decision for one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Let the placement continue.
    Allow,
    /// Veto it; the caller reverts the client prediction.
    Deny,
}

/// A block-change guard installed on a world.
pub type BlockChangeGuard = Arc<dyn Fn(&Player, BlockPos, BlockId) -> GuardVerdict + Send + Sync>;

/// Token identifying an installed guard, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardId(pub(crate) u64);
