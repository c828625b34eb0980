//! Sponge drying.
//!
//! A sponge keeps every cell within [`SPONGE_RADIUS`] dry: liquids checking
//! a sponged cell refuse to flow there, and placing a sponge dries the area
//! immediately. Removing one re-checks the surrounding shell so liquids can
//! reclaim it.

use basalt_registry::blocks;
use basalt_utils::BlockPos;

use crate::behavior::ChangeResult;

use super::context::{PhysicsContext, PlaceContext};

/// Chebyshev radius of a sponge's dry zone.
pub const SPONGE_RADIUS: i32 = 2;

/// True if the cell lies within the dry zone of any sponge.
#[must_use]
pub fn is_sponged(ctx: &PhysicsContext<'_>, pos: BlockPos) -> bool {
    for dy in -SPONGE_RADIUS..=SPONGE_RADIUS {
        for dz in -SPONGE_RADIUS..=SPONGE_RADIUS {
            for dx in -SPONGE_RADIUS..=SPONGE_RADIUS {
                if let Some((_, block)) = ctx.get_indexed(pos.offset(dx, dy, dz))
                    && block == blocks::SPONGE
                {
                    return true;
                }
            }
        }
    }
    false
}

/// Dries all liquid in the sponge's zone. Water always; lava only when the
/// sponge is working against a lava flood.
pub fn dry_around(ctx: &mut PhysicsContext<'_>, pos: BlockPos, include_lava: bool) {
    for dy in -SPONGE_RADIUS..=SPONGE_RADIUS {
        for dz in -SPONGE_RADIUS..=SPONGE_RADIUS {
            for dx in -SPONGE_RADIUS..=SPONGE_RADIUS {
                let Some((index, block)) = ctx.get_indexed(pos.offset(dx, dy, dz)) else {
                    continue;
                };
                let wet = blocks::is_active_water(block)
                    || block == blocks::STILL_WATER
                    || (include_lava
                        && (blocks::is_active_lava(block) || block == blocks::STILL_LAVA));
                if wet {
                    ctx.queue_update(index, blocks::AIR);
                }
            }
        }
    }
}

/// Re-checks liquids on the shell around a removed sponge so they can flow
/// back into the dried zone.
pub fn on_removed(ctx: &mut PhysicsContext<'_>, pos: BlockPos, include_lava: bool) {
    let reach = SPONGE_RADIUS + 1;
    for dy in -reach..=reach {
        for dz in -reach..=reach {
            for dx in -reach..=reach {
                let Some((index, block)) = ctx.get_indexed(pos.offset(dx, dy, dz)) else {
                    continue;
                };
                let liquid = blocks::is_active_water(block)
                    || (include_lava && blocks::is_active_lava(block));
                if liquid {
                    ctx.add_check(index);
                }
            }
        }
    }
}

/// Default place handler for sponges: write the block, then force the zone
/// dry at once rather than waiting for the liquids to notice.
pub fn place_sponge(ctx: &mut PlaceContext<'_>) -> ChangeResult {
    let result = ctx.commit(blocks::SPONGE);
    if result == ChangeResult::Applied {
        let pos = ctx.pos;
        dry_around(&mut ctx.physics, pos, false);
    }
    result
}
