//! Built-in liquid spread.
//!
//! Water and lava re-evaluations examine the horizontal neighbors and the
//! cell below, classify each by its current block, and either claim it,
//! collide into stone, mark it for its own re-check, or consume it per the
//! block's kill flags. Neighbors are checked in `+x, -x, +z, -z, -y, +y`
//! order; the upward slot only participates for game modes that flood
//! upward.

use basalt_registry::blocks;
use basalt_utils::{BlockId, BlockPos};

use super::check_queue::PendingCheck;
use super::context::PhysicsContext;
use super::sponge;

/// Neighbor offsets in spread order. The final entry (above) is only used
/// when upward flooding is enabled.
pub static SPREAD_ORDER: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
    (0, -1, 0),
    (0, 1, 0),
];

/// Physics handler for active water variants.
pub fn water_physics(ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck) {
    let pos = ctx.pos_of(entry.index);
    let liquid = ctx.block_at(entry.index);

    if sponge::is_sponged(ctx, pos) {
        // Placed inside a dry zone: the water evaporates.
        ctx.queue_update(entry.index, blocks::AIR);
    } else {
        for &(dx, dy, dz) in &SPREAD_ORDER[..5] {
            spread_water(ctx, pos.offset(dx, dy, dz), liquid);
        }
    }
    entry.remove_from_checks();
}

fn spread_water(ctx: &mut PhysicsContext<'_>, target: BlockPos, liquid: BlockId) {
    let Some((index, block)) = ctx.get_indexed(target) else {
        return;
    };

    if block == blocks::AIR {
        if !sponge::is_sponged(ctx, target) {
            ctx.queue_update(index, liquid);
        }
    } else if blocks::is_active_lava(block) {
        if !sponge::is_sponged(ctx, target) {
            ctx.queue_update(index, blocks::STONE);
        }
    } else if block == blocks::SAND || block == blocks::GRAVEL || block == blocks::LOG {
        // May fall or float once the water reaches it.
        ctx.add_check(index);
    } else if blocks::is_active_water(block) || block == blocks::COAL_ORE {
        // Already wet, or mid-smolder.
    } else if ctx.props(block).water_kills {
        ctx.queue_update(index, liquid);
    }
}

/// Physics handler for active lava variants.
///
/// A delay counter on the entry gates spread frequency; fast lava skips
/// the gate.
pub fn lava_physics(ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck) {
    let liquid = ctx.block_at(entry.index);

    if liquid != blocks::FAST_LAVA && entry.delay < ctx.lava_spread_delay() {
        entry.delay += 1;
        return;
    }

    let pos = ctx.pos_of(entry.index);
    for &(dx, dy, dz) in &SPREAD_ORDER[..5] {
        spread_lava(ctx, pos.offset(dx, dy, dz), liquid);
    }
    entry.remove_from_checks();
}

fn spread_lava(ctx: &mut PhysicsContext<'_>, target: BlockPos, liquid: BlockId) {
    let Some((index, block)) = ctx.get_indexed(target) else {
        return;
    };

    if block == blocks::AIR {
        ctx.queue_update(index, liquid);
    } else if blocks::is_active_water(block) {
        // Liquids colliding leave a solid seam.
        ctx.queue_update(index, blocks::STONE);
    } else if block == blocks::SAND {
        if ctx.physics_level() > 1 {
            // Advanced physics vitrifies sand next to lava.
            ctx.queue_update(index, blocks::GLASS);
        } else {
            ctx.add_check(index);
        }
    } else if block == blocks::GRAVEL {
        ctx.add_check(index);
    } else if blocks::is_active_lava(block) || block == blocks::COAL_ORE {
        // Already molten, or mid-smolder.
    } else if ctx.props(block).lava_kills {
        ctx.queue_update(index, liquid);
    }
}
