use std::sync::Arc;

use basalt_core::config::WorldSettings;
use basalt_core::player::Player;
use basalt_core::{ChangeResult, World, WorldError};
use basalt_registry::blocks;
use basalt_utils::BlockPos;

use super::*;

fn arena(seed: u64) -> Arc<World> {
    let settings = WorldSettings {
        seed: Some(seed),
        ..WorldSettings::default()
    };
    Arc::new(World::new("arena", 16, 16, 16, settings))
}

fn base_config() -> FloodConfig {
    FloodConfig {
        spawn_protection: false,
        flood_pos: [8, 8, 8],
        spread_delay: 0,
        ..FloodConfig::default()
    }
}

const MODE_BLOCKS: [basalt_utils::BlockId; 7] = [
    blocks::SPONGE,
    blocks::STILL_WATER,
    blocks::WATER,
    blocks::DEADLY_WATER,
    blocks::LAVA,
    blocks::DEADLY_LAVA,
    blocks::DOOR_LOG,
];

#[test]
fn restore_after_install_is_a_round_trip() {
    let world = arena(1);
    let before: Vec<_> = {
        let table = world.behaviors().read();
        MODE_BLOCKS.iter().map(|b| table.entry(*b)).collect()
    };

    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");
    {
        let table = world.behaviors().read();
        assert!(!table.entry(blocks::WATER).same_as(&before[2]));
    }

    game.end().expect("running round");
    let table = world.behaviors().read();
    for (block, saved) in MODE_BLOCKS.iter().zip(&before) {
        assert!(
            table.entry(*block).same_as(saved),
            "entry for {} did not round-trip",
            blocks::name(*block)
        );
    }
}

#[test]
fn lifecycle_calls_error_out_of_order() {
    let world = arena(2);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());

    assert!(matches!(game.end(), Err(WorldError::InvalidLifecycle { .. })));
    assert!(matches!(
        game.set_flood_tier(FloodTier::Wild),
        Err(WorldError::InvalidLifecycle { .. })
    ));
    assert!(matches!(
        game.set_safe_zone(BlockPos::new(1, 1, 1), 2),
        Err(WorldError::InvalidLifecycle { .. })
    ));
    assert!(matches!(
        game.begin_flood(),
        Err(WorldError::InvalidLifecycle { .. })
    ));

    game.start().expect("fresh round");
    assert!(matches!(game.start(), Err(WorldError::InvalidLifecycle { .. })));
    game.end().expect("running round");
    assert!(matches!(game.end(), Err(WorldError::InvalidLifecycle { .. })));
}

#[test]
fn budgets_gate_placement_and_referees_bypass() {
    let world = arena(3);
    let config = FloodConfig {
        water_blocks: 3,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    let player = Player::new("survivor");
    game.join(&player);

    for i in 0..3 {
        let pos = BlockPos::new(1 + i, 1, 1);
        assert_eq!(
            world.change_block(&player, pos, blocks::STILL_WATER),
            ChangeResult::Applied
        );
        assert_eq!(world.get_block(pos), Ok(blocks::STILL_WATER));
    }

    // Fourth placement: out of budget, grid untouched, player told.
    let rejected = BlockPos::new(5, 1, 1);
    assert_eq!(
        world.change_block(&player, rejected, blocks::STILL_WATER),
        ChangeResult::NoBudget
    );
    assert_eq!(world.get_block(rejected), Ok(blocks::AIR));
    let messages = player.drain_messages();
    assert!(
        messages
            .iter()
            .any(|m| m.contains("You have no Water blocks left")),
        "missing rejection message in {messages:?}"
    );

    // A referee places freely and is never charged.
    player.set_referee(true);
    assert_eq!(
        world.change_block(&player, rejected, blocks::STILL_WATER),
        ChangeResult::Applied
    );
    assert_eq!(game.round_of(&player).expect("joined").water_left, 0);

    player.set_referee(false);
    assert_eq!(
        world.change_block(&player, BlockPos::new(6, 1, 1), blocks::STILL_WATER),
        ChangeResult::NoBudget
    );

    game.end().expect("running round");
}

#[test]
fn door_placement_spends_the_door_budget() {
    let world = arena(4);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");

    let player = Player::new("survivor");
    game.join(&player);
    let doors_at_start = game.round_of(&player).expect("joined").doors_left;

    let pos = BlockPos::new(2, 2, 2);
    assert_eq!(
        world.change_block(&player, pos, blocks::DOOR_LOG),
        ChangeResult::Applied
    );
    assert_eq!(world.get_block(pos), Ok(blocks::DOOR_LOG));
    assert_eq!(
        game.round_of(&player).expect("joined").doors_left,
        doors_at_start - 1
    );

    game.end().expect("running round");
}

#[test]
fn a_round_sponge_lives_exactly_its_configured_life() {
    let world = arena(5);
    let config = FloodConfig {
        sponge_life: 3,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    let player = Player::new("survivor");
    game.join(&player);
    let pos = BlockPos::new(8, 8, 8);
    assert_eq!(
        world.change_block(&player, pos, blocks::SPONGE),
        ChangeResult::Applied
    );

    world.tick();
    world.tick();
    assert_eq!(world.get_block(pos), Ok(blocks::SPONGE));

    world.tick();
    assert_eq!(world.get_block(pos), Ok(blocks::AIR));
    assert_eq!(world.has_pending_check(pos), Ok(false));

    // Gone for good, never re-enqueued.
    world.tick();
    world.tick();
    assert_eq!(world.get_block(pos), Ok(blocks::AIR));
    assert_eq!(world.pending_checks(), 0);

    game.end().expect("running round");
}

#[test]
fn a_lava_round_sponge_dries_lava_too() {
    let world = arena(6);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");

    let lava = BlockPos::new(10, 8, 8);
    world.set_block(lava, blocks::STILL_LAVA).expect("in bounds");

    let player = Player::new("survivor");
    game.join(&player);
    assert_eq!(
        world.change_block(&player, BlockPos::new(8, 8, 8), blocks::SPONGE),
        ChangeResult::Applied
    );
    assert_eq!(world.get_block(lava), Ok(blocks::AIR));

    game.end().expect("running round");
}

#[test]
fn the_safe_zone_is_exempt_from_spread() {
    let world = arena(7);
    let config = FloodConfig {
        safe_pos: Some([10, 8, 8]),
        safe_zone_radius: 1,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    let source = BlockPos::new(8, 8, 8);
    world.set_block(source, blocks::WATER).expect("in bounds");
    world.tick();

    // The +x neighbor sits inside the zone and stays untouched.
    assert_eq!(world.get_block(BlockPos::new(9, 8, 8)), Ok(blocks::AIR));
    assert_eq!(world.get_block(BlockPos::new(7, 8, 8)), Ok(blocks::WATER));

    game.end().expect("running round");
}

#[test]
fn furious_flood_destroys_kill_flagged_blocks_outright() {
    let world = arena(8);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");
    game.set_flood_tier(FloodTier::Furious).expect("running");

    let source = BlockPos::new(8, 8, 8);
    let sapling = source.offset(1, 0, 0);
    world.set_block(sapling, blocks::SAPLING).expect("in bounds");
    world.set_block(source, blocks::WATER).expect("in bounds");

    world.tick();
    assert_eq!(world.get_block(sapling), Ok(blocks::AIR));

    game.end().expect("running round");
}

#[test]
fn a_calm_flood_claims_air_but_consumes_nothing() {
    let world = arena(9);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");

    let source = BlockPos::new(8, 8, 8);
    let stone = source.offset(1, 0, 0);
    world.set_block(stone, blocks::STONE).expect("in bounds");
    world.set_block(source, blocks::WATER).expect("in bounds");

    for _ in 0..10 {
        world.enqueue_check(source).expect("in bounds");
        world.tick();
    }

    assert_eq!(world.get_block(stone), Ok(blocks::STONE));
    assert_eq!(world.get_block(source.offset(-1, 0, 0)), Ok(blocks::WATER));

    game.end().expect("running round");
}

#[test]
fn op_blocks_are_exempt_from_burn_rolls() {
    let world = arena(10);
    world.behaviors().write().props_mut()[blocks::STONE.0 as usize].op_block = true;

    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");
    game.set_flood_tier(FloodTier::Wild).expect("running");

    let source = BlockPos::new(8, 8, 8);
    let stone = source.offset(1, 0, 0);
    world.set_block(stone, blocks::STONE).expect("in bounds");
    world.set_block(source, blocks::WATER).expect("in bounds");

    for _ in 0..30 {
        world.enqueue_check(source).expect("in bounds");
        world.tick();
    }
    assert_eq!(world.get_block(stone), Ok(blocks::STONE));

    game.end().expect("running round");
}

#[test]
fn a_wild_flood_smolders_blocks_which_then_burn_away() {
    let world = arena(11);
    let mut game = FloodGame::new(Arc::clone(&world), base_config());
    game.start().expect("fresh round");
    game.set_flood_tier(FloodTier::Wild).expect("running");

    let source = BlockPos::new(8, 8, 8);
    let walls = [
        source.offset(1, 0, 0),
        source.offset(-1, 0, 0),
        source.offset(0, 0, 1),
        source.offset(0, 0, -1),
        source.offset(0, -1, 0),
    ];
    for wall in walls {
        world.set_block(wall, blocks::STONE).expect("in bounds");
    }
    world.set_block(source, blocks::WATER).expect("in bounds");

    // Keep re-evaluating the source until a wall starts to smolder.
    let mut smoldering = None;
    for _ in 0..50 {
        world.enqueue_check(source).expect("in bounds");
        world.tick();
        if let Some(hit) = walls
            .iter()
            .find(|w| world.get_block(**w) == Ok(blocks::COAL_ORE))
        {
            smoldering = Some(*hit);
            break;
        }
    }
    let smoldering = smoldering.expect("an 85% roll over dozens of attempts");

    // Left alone, the smolder waits out its delay and dissipates to air.
    let mut burned_away = false;
    for _ in 0..2000 {
        world.tick();
        if world.get_block(smoldering) == Ok(blocks::AIR) {
            burned_away = true;
            break;
        }
    }
    assert!(burned_away, "smolder never dissipated");

    game.end().expect("running round");
}

#[test]
fn spawn_protection_rejects_placements_near_the_flood() {
    let world = arena(12);
    let config = FloodConfig {
        spawn_protection: true,
        spawn_protection_radius: 2,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    let player = Player::new("survivor");
    game.join(&player);

    let near = BlockPos::new(8, 9, 8);
    assert_eq!(
        world.change_block(&player, near, blocks::STONE),
        ChangeResult::Invalid
    );
    assert_eq!(world.get_block(near), Ok(blocks::AIR));
    assert!(
        player
            .drain_messages()
            .iter()
            .any(|m| m.contains("so close to the"))
    );

    assert_eq!(
        world.change_block(&player, BlockPos::new(13, 13, 13), blocks::STONE),
        ChangeResult::Applied
    );

    // The guard leaves with the round.
    game.end().expect("running round");
    assert_eq!(
        world.change_block(&player, near, blocks::STONE),
        ChangeResult::Applied
    );
}

#[test]
fn an_upward_flood_climbs() {
    let world = arena(13);
    let config = FloodConfig {
        water_round: true,
        flood_upward: true,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    assert_eq!(game.flood_block(), blocks::DEADLY_WATER);
    game.begin_flood().expect("running round");
    world.tick();

    let origin = BlockPos::new(8, 8, 8);
    assert_eq!(
        world.get_block(origin.offset(0, 1, 0)),
        Ok(blocks::DEADLY_WATER)
    );
    assert_eq!(
        world.get_block(origin.offset(0, -1, 0)),
        Ok(blocks::DEADLY_WATER)
    );

    game.end().expect("running round");
}

#[test]
fn deaths_cost_a_life_and_then_the_round() {
    let world = arena(14);
    let config = FloodConfig {
        start_lives: 2,
        ..base_config()
    };
    let mut game = FloodGame::new(Arc::clone(&world), config);
    game.start().expect("fresh round");

    let player = Player::new("survivor");
    game.join(&player);
    assert!(!game.is_player_dead(&player));

    assert!(game.on_player_died(&player).is_some());
    assert!(!game.is_player_dead(&player));

    assert!(game.on_player_died(&player).is_some());
    assert!(game.is_player_dead(&player));

    // Further deaths are cancelled upstream.
    assert!(game.on_player_died(&player).is_none());

    game.end().expect("running round");
}
