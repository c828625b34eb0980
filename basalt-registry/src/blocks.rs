//! The block palette.
//!
//! Ids 0..=49 are the classic client palette and go over the wire as-is.
//! Ids from [`EXTENDED_START`] up are server-side variants that the session
//! layer maps down to a classic id before sending.

use basalt_utils::BlockId;

/// Empty space.
pub const AIR: BlockId = BlockId(0);
/// Stone.
pub const STONE: BlockId = BlockId(1);
/// Grass-covered dirt.
pub const GRASS: BlockId = BlockId(2);
/// Dirt.
pub const DIRT: BlockId = BlockId(3);
/// Cobblestone.
pub const COBBLESTONE: BlockId = BlockId(4);
/// Wooden planks.
pub const WOOD: BlockId = BlockId(5);
/// Sapling.
pub const SAPLING: BlockId = BlockId(6);
/// Unbreakable world floor.
pub const BEDROCK: BlockId = BlockId(7);
/// Flowing water.
pub const WATER: BlockId = BlockId(8);
/// Still water, inert until disturbed.
pub const STILL_WATER: BlockId = BlockId(9);
/// Flowing lava.
pub const LAVA: BlockId = BlockId(10);
/// Still lava, inert until disturbed.
pub const STILL_LAVA: BlockId = BlockId(11);
/// Sand, falls when unsupported.
pub const SAND: BlockId = BlockId(12);
/// Gravel, falls when unsupported.
pub const GRAVEL: BlockId = BlockId(13);
/// Gold ore.
pub const GOLD_ORE: BlockId = BlockId(14);
/// Iron ore.
pub const IRON_ORE: BlockId = BlockId(15);
/// Coal ore. Doubles as the charred block left behind by a flood burn.
pub const COAL_ORE: BlockId = BlockId(16);
/// Tree trunk. Floats on liquids rather than being consumed.
pub const LOG: BlockId = BlockId(17);
/// Leaves.
pub const LEAVES: BlockId = BlockId(18);
/// Sponge, dries water around itself.
pub const SPONGE: BlockId = BlockId(19);
/// Glass.
pub const GLASS: BlockId = BlockId(20);

/// Dandelion.
pub const YELLOW_FLOWER: BlockId = BlockId(37);
/// Rose.
pub const RED_FLOWER: BlockId = BlockId(38);
/// Brown mushroom.
pub const BROWN_MUSHROOM: BlockId = BlockId(39);
/// Red mushroom.
pub const RED_MUSHROOM: BlockId = BlockId(40);
/// Bookshelf.
pub const BOOKSHELF: BlockId = BlockId(47);
/// Mossy cobblestone.
pub const MOSSY_COBBLESTONE: BlockId = BlockId(48);
/// Obsidian.
pub const OBSIDIAN: BlockId = BlockId(49);

/// First id of the server-side extended range.
pub const EXTENDED_START: u16 = 64;

/// Lava that spreads without the per-evaluation delay gate.
pub const FAST_LAVA: BlockId = BlockId(64);
/// Active water that kills players on contact.
pub const DEADLY_WATER: BlockId = BlockId(65);
/// Active lava that kills players on contact.
pub const DEADLY_LAVA: BlockId = BlockId(66);
/// Log that acts as an openable door.
pub const DOOR_LOG: BlockId = BlockId(67);

/// Number of block ids the behavior table reserves slots for.
pub const BLOCK_COUNT: usize = 68;

/// Returns a human-readable name for a block id.
#[must_use]
pub fn name(block: BlockId) -> &'static str {
    match block {
        AIR => "air",
        STONE => "stone",
        GRASS => "grass",
        DIRT => "dirt",
        COBBLESTONE => "cobblestone",
        WOOD => "wood",
        SAPLING => "sapling",
        BEDROCK => "bedrock",
        WATER => "water",
        STILL_WATER => "still water",
        LAVA => "lava",
        STILL_LAVA => "still lava",
        SAND => "sand",
        GRAVEL => "gravel",
        GOLD_ORE => "gold ore",
        IRON_ORE => "iron ore",
        COAL_ORE => "coal ore",
        LOG => "log",
        LEAVES => "leaves",
        SPONGE => "sponge",
        GLASS => "glass",
        YELLOW_FLOWER => "dandelion",
        RED_FLOWER => "rose",
        BROWN_MUSHROOM => "brown mushroom",
        RED_MUSHROOM => "red mushroom",
        BOOKSHELF => "bookshelf",
        MOSSY_COBBLESTONE => "mossy cobblestone",
        OBSIDIAN => "obsidian",
        FAST_LAVA => "fast lava",
        DEADLY_WATER => "deadly water",
        DEADLY_LAVA => "deadly lava",
        DOOR_LOG => "log door",
        _ => "unknown",
    }
}

/// Returns true for any active water variant.
#[must_use]
pub fn is_active_water(block: BlockId) -> bool {
    block == WATER || block == DEADLY_WATER
}

/// Returns true for any active lava variant.
#[must_use]
pub fn is_active_lava(block: BlockId) -> bool {
    block == LAVA || block == FAST_LAVA || block == DEADLY_LAVA
}

/// Returns true for any liquid, active or still.
#[must_use]
pub fn is_liquid(block: BlockId) -> bool {
    is_active_water(block) || is_active_lava(block) || block == STILL_WATER || block == STILL_LAVA
}
