//! Generic timed transitions carried by pending-check entries.
//!
//! A check can carry up to two deferred operations. The scheduler interprets
//! them for blocks that have no physics handler of their own, which is how
//! one-shot effects like "smolder for a while, then maybe burn away" run
//! without a dedicated handler per block type.

use basalt_registry::blocks;

use super::PendingCheck;
use super::context::PhysicsContext;

/// One deferred operation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeferredOp {
    /// Empty slot.
    #[default]
    None,
    /// Hold for `ticks` evaluations, then fall through to the next slot.
    Wait {
        /// Evaluations to wait.
        ticks: u8,
    },
    /// Roll `chance`/100; success reverts the cell to air, failure re-arms
    /// the preceding wait and keeps the entry queued.
    Dissipate {
        /// Percentage chance per attempt.
        chance: u8,
    },
}

/// Both slots empty.
pub const NO_OPS: [DeferredOp; 2] = [DeferredOp::None, DeferredOp::None];

/// Runs one evaluation of an entry's deferred operations.
pub(crate) fn run(ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck) {
    match (entry.ops[0], entry.ops[1]) {
        (DeferredOp::None, DeferredOp::None) => entry.remove_from_checks(),

        // A lone op in the second slot promotes to the first.
        (DeferredOp::None, second) => {
            entry.ops = [second, DeferredOp::None];
            entry.elapsed = 0;
        }

        (DeferredOp::Wait { ticks }, next) => {
            if entry.elapsed < u16::from(ticks) {
                entry.elapsed += 1;
                return;
            }
            match next {
                DeferredOp::None => entry.remove_from_checks(),
                DeferredOp::Dissipate { chance } => {
                    if ctx.roll_percent(chance) {
                        ctx.queue_update(entry.index, blocks::AIR);
                        entry.remove_from_checks();
                    } else {
                        // Failed roll: persist and re-arm the wait.
                        entry.elapsed = 0;
                    }
                }
                DeferredOp::Wait { .. } => {
                    entry.ops = [next, DeferredOp::None];
                    entry.elapsed = 0;
                }
            }
        }

        (DeferredOp::Dissipate { chance }, _) => {
            if ctx.roll_percent(chance) {
                ctx.queue_update(entry.index, blocks::AIR);
                entry.remove_from_checks();
            }
        }
    }
}
