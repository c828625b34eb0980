//! Flood-round block handlers.
//!
//! These replace the default liquid and sponge behaviors for the duration
//! of a round. The liquids spread with the round's aggressiveness tier and
//! safe-zone rules layered on; placements of the mode's defensive blocks go
//! through the shared budget routine.

use std::sync::Arc;

use basalt_core::behavior::{BehaviorEntry, ChangeResult, PhysicsHandler, PlaceHandler};
use basalt_core::physics::{DeferredOp, PendingCheck, PhysicsContext, PlaceContext, liquid, sponge};
use basalt_registry::blocks;
use basalt_utils::{BlockId, BlockPos};

use super::{FloodTier, PlayerRound, RoundCore};

/// The charred block a burn leaves behind while it smolders out.
const SMOLDER_BLOCK: BlockId = blocks::COAL_ORE;

/// The limited block types the budget routine manages.
#[derive(Debug, Clone, Copy)]
enum BudgetKind {
    Sponges,
    WaterBlocks,
    Doors,
}

impl BudgetKind {
    fn label(self) -> &'static str {
        match self {
            Self::Sponges => "Sponges",
            Self::WaterBlocks => "Water blocks",
            Self::Doors => "Door blocks",
        }
    }

    fn block(self) -> BlockId {
        match self {
            Self::Sponges => blocks::SPONGE,
            Self::WaterBlocks => blocks::STILL_WATER,
            Self::Doors => blocks::DOOR_LOG,
        }
    }

    fn remaining(self, round: &mut PlayerRound) -> &mut i32 {
        match self {
            Self::Sponges => &mut round.sponges_left,
            Self::WaterBlocks => &mut round.water_left,
            Self::Doors => &mut round.doors_left,
        }
    }
}

/// Shared budget-checked placement.
///
/// Referees bypass the budget and never decrement it. Everyone else gets a
/// running count back at every multiple of ten and every unit below ten.
fn try_place(ctx: &mut PlaceContext<'_>, core: &RoundCore, kind: BudgetKind) -> ChangeResult {
    let mut players = core.players.lock();
    let round = players
        .entry(ctx.player.id)
        .or_insert_with(|| core.fresh_round());

    if !ctx.player.is_referee() && *kind.remaining(round) <= 0 {
        ctx.player
            .message(format!("You have no {} left", kind.label()));
        return ChangeResult::NoBudget;
    }

    if ctx.commit(kind.block()) != ChangeResult::Applied {
        return ChangeResult::Invalid;
    }
    if ctx.player.is_referee() {
        return ChangeResult::Applied;
    }

    let left = kind.remaining(round);
    *left -= 1;
    if *left % 10 == 0 || *left <= 10 {
        ctx.player
            .message(format!("{} left: &4{}", kind.label(), *left));
    }
    ChangeResult::Applied
}

/// Builds the full override set a round installs.
pub(crate) fn build_overrides(core: &Arc<RoundCore>) -> Vec<(BlockId, BehaviorEntry)> {
    let water = flood_water(core);
    let lava = flood_lava(core);
    vec![
        (
            blocks::SPONGE,
            BehaviorEntry {
                place: Some(place_budgeted_sponge(core)),
                physics: Some(sponge_decay(core)),
            },
        ),
        (
            blocks::STILL_WATER,
            BehaviorEntry {
                place: Some(place_budgeted(core, BudgetKind::WaterBlocks)),
                physics: None,
            },
        ),
        (
            blocks::WATER,
            BehaviorEntry {
                place: None,
                physics: Some(Arc::clone(&water)),
            },
        ),
        (
            blocks::DEADLY_WATER,
            BehaviorEntry {
                place: None,
                physics: Some(water),
            },
        ),
        (
            blocks::LAVA,
            BehaviorEntry {
                place: None,
                physics: Some(Arc::clone(&lava)),
            },
        ),
        (
            blocks::DEADLY_LAVA,
            BehaviorEntry {
                place: None,
                physics: Some(lava),
            },
        ),
        (
            blocks::DOOR_LOG,
            BehaviorEntry {
                place: Some(place_budgeted(core, BudgetKind::Doors)),
                physics: None,
            },
        ),
    ]
}

fn place_budgeted(core: &Arc<RoundCore>, kind: BudgetKind) -> PlaceHandler {
    let core = Arc::clone(core);
    Arc::new(move |ctx: &mut PlaceContext<'_>| try_place(ctx, &core, kind))
}

fn place_budgeted_sponge(core: &Arc<RoundCore>) -> PlaceHandler {
    let core = Arc::clone(core);
    Arc::new(move |ctx: &mut PlaceContext<'_>| {
        let result = try_place(ctx, &core, BudgetKind::Sponges);
        if result == ChangeResult::Applied {
            // Force the zone dry now; in a lava round the sponge works
            // against lava as well.
            let pos = ctx.pos;
            sponge::dry_around(&mut ctx.physics, pos, !core.config.water_round);
        }
        result
    })
}

/// Round sponges wear out: after exactly `sponge_life` evaluations the
/// sponge burns away and frees the liquids it was holding back.
fn sponge_decay(core: &Arc<RoundCore>) -> PhysicsHandler {
    let core = Arc::clone(core);
    Arc::new(move |ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck| {
        entry.elapsed += 1;
        if entry.elapsed < core.config.sponge_life {
            return;
        }
        // The queue hook re-checks the freed shell when the sponge goes.
        ctx.queue_update(entry.index, blocks::AIR);
        entry.remove_from_checks();
    })
}

fn flood_water(core: &Arc<RoundCore>) -> PhysicsHandler {
    let core = Arc::clone(core);
    Arc::new(move |ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck| {
        let pos = ctx.pos_of(entry.index);
        let liquid_block = ctx.block_at(entry.index);

        if sponge::is_sponged(ctx, pos) {
            ctx.queue_update(entry.index, blocks::AIR);
        } else {
            for &(dx, dy, dz) in core.spread_dirs() {
                core.spread_water(ctx, pos.offset(dx, dy, dz), liquid_block);
            }
        }
        entry.remove_from_checks();
    })
}

fn flood_lava(core: &Arc<RoundCore>) -> PhysicsHandler {
    let core = Arc::clone(core);
    Arc::new(move |ctx: &mut PhysicsContext<'_>, entry: &mut PendingCheck| {
        if entry.delay < core.config.spread_delay {
            entry.delay += 1;
            return;
        }

        let pos = ctx.pos_of(entry.index);
        let liquid_block = ctx.block_at(entry.index);

        // Round sponges hold back lava too.
        if sponge::is_sponged(ctx, pos) {
            ctx.queue_update(entry.index, blocks::AIR);
        } else {
            for &(dx, dy, dz) in core.spread_dirs() {
                core.spread_lava(ctx, pos.offset(dx, dy, dz), liquid_block);
            }
        }
        entry.remove_from_checks();
    })
}

impl RoundCore {
    fn spread_dirs(&self) -> &'static [(i32, i32, i32)] {
        if self.flood_up() {
            &liquid::SPREAD_ORDER
        } else {
            &liquid::SPREAD_ORDER[..5]
        }
    }

    fn spread_water(&self, ctx: &mut PhysicsContext<'_>, target: BlockPos, liquid_block: BlockId) {
        let Some((index, block)) = ctx.get_indexed(target) else {
            return;
        };
        if self.in_safe_zone(target) {
            return;
        }

        if block == blocks::AIR {
            if !sponge::is_sponged(ctx, target) {
                ctx.queue_update(index, liquid_block);
            }
        } else if blocks::is_active_lava(block) {
            if !sponge::is_sponged(ctx, target) {
                ctx.queue_update(index, blocks::STONE);
            }
        } else if block == blocks::SAND || block == blocks::GRAVEL || block == blocks::LOG {
            ctx.add_check(index);
        } else if blocks::is_active_water(block) || block == SMOLDER_BLOCK {
            // Already claimed, or mid-smolder.
        } else {
            self.spread_liquid(ctx, target, index, block, true);
        }
    }

    fn spread_lava(&self, ctx: &mut PhysicsContext<'_>, target: BlockPos, liquid_block: BlockId) {
        let Some((index, block)) = ctx.get_indexed(target) else {
            return;
        };
        if self.in_safe_zone(target) {
            return;
        }

        if block == blocks::AIR {
            if !sponge::is_sponged(ctx, target) {
                ctx.queue_update(index, liquid_block);
            }
        } else if blocks::is_active_water(block) {
            if !sponge::is_sponged(ctx, target) {
                ctx.queue_update(index, blocks::STONE);
            }
        } else if block == blocks::SAND {
            if ctx.physics_level() > 1 {
                ctx.queue_update(index, blocks::GLASS);
            } else {
                ctx.add_check(index);
            }
        } else if block == blocks::GRAVEL {
            ctx.add_check(index);
        } else if blocks::is_active_lava(block) || block == SMOLDER_BLOCK {
            // Already molten, or mid-smolder.
        } else {
            self.spread_liquid(ctx, target, index, block, false);
        }
    }

    /// The generic spread sub-algorithm: the tier decides whether a block
    /// is destroyed outright, starts to smolder, or survives.
    fn spread_liquid(
        &self,
        ctx: &mut PhysicsContext<'_>,
        target: BlockPos,
        index: u32,
        block: BlockId,
        is_water: bool,
    ) {
        let tier = self.tier();
        if tier == FloodTier::Calm {
            return;
        }

        let props = ctx.props(block);
        let insta_kills = if is_water {
            props.water_kills
        } else {
            props.lava_kills
        };

        if insta_kills && tier > FloodTier::Disturbed {
            if !sponge::is_sponged(ctx, target) {
                ctx.queue_update(index, blocks::AIR);
            }
        } else if !props.op_block && ctx.roll_percent(tier.burn_chance()) {
            ctx.queue_update_with(
                index,
                SMOLDER_BLOCK,
                [
                    DeferredOp::Wait {
                        ticks: tier.destroy_delay(),
                    },
                    DeferredOp::Dissipate {
                        chance: tier.dissipate_chance(),
                    },
                ],
            );
        }
    }
}
