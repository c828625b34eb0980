//! Per-block static properties.

use basalt_utils::BlockId;

use crate::blocks;

/// Static flags the physics engine consults for a block type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockProps {
    /// Water flowing into this block consumes it.
    pub water_kills: bool,
    /// Lava flowing into this block consumes it.
    pub lava_kills: bool,
    /// Operator block: exempt from liquid kill/burn rolls entirely.
    pub op_block: bool,
}

/// The default property table, indexed by block id.
///
/// Worlds copy this at creation; game modes may edit their world's copy.
#[must_use]
pub fn default_props() -> Vec<BlockProps> {
    let mut props = vec![BlockProps::default(); blocks::BLOCK_COUNT];

    let water_kills = [
        blocks::SAPLING,
        blocks::YELLOW_FLOWER,
        blocks::RED_FLOWER,
        blocks::BROWN_MUSHROOM,
        blocks::RED_MUSHROOM,
    ];
    for block in water_kills {
        props[block.0 as usize].water_kills = true;
    }

    let lava_kills = [
        blocks::WOOD,
        blocks::LOG,
        blocks::LEAVES,
        blocks::BOOKSHELF,
        blocks::SAPLING,
        blocks::YELLOW_FLOWER,
        blocks::RED_FLOWER,
        blocks::BROWN_MUSHROOM,
        blocks::RED_MUSHROOM,
    ];
    for block in lava_kills {
        props[block.0 as usize].lava_kills = true;
    }

    props[blocks::BEDROCK.0 as usize].op_block = true;

    props
}

/// Looks up a block's properties in a table, falling back to inert defaults
/// for ids past the table's end.
#[must_use]
pub fn get(props: &[BlockProps], block: BlockId) -> BlockProps {
    props
        .get(block.0 as usize)
        .copied()
        .unwrap_or_default()
}
