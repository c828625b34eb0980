//! Falling blocks.
//!
//! Sand and gravel sink one cell per evaluation through air and liquids
//! until they rest on something solid. The queue hook re-queues the block
//! at its new position, so a column keeps moving tick by tick.

use basalt_registry::blocks;

use super::check_queue::PendingCheck;
use super::context::PhysicsContext;

/// Physics handler for sand and gravel.
pub fn falling_physics(ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck) {
    let pos = ctx.pos_of(entry.index);
    let block = ctx.block_at(entry.index);
    let below = pos.offset(0, -1, 0);

    if let Some((below_index, target)) = ctx.get_indexed(below)
        && (target == blocks::AIR || blocks::is_liquid(target))
    {
        ctx.queue_update(entry.index, blocks::AIR);
        ctx.queue_update(below_index, block);
    }
    entry.remove_from_checks();
}
