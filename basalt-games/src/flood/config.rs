//! Flood round configuration.

use basalt_utils::BlockPos;
use serde::Deserialize;

/// Settings for one flood-survival map.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    /// Flood with water instead of lava.
    pub water_round: bool,
    /// Let the flood climb upward as well.
    pub flood_upward: bool,
    /// Physics evaluations a sponge survives before burning out.
    pub sponge_life: u16,
    /// Evaluations a flood lava cell waits between spread steps.
    pub spread_delay: u8,
    /// Protect placements around the flood spawn.
    pub spawn_protection: bool,
    /// Chebyshev radius of the placement-protected region.
    pub spawn_protection_radius: i32,
    /// Where the flood enters the world.
    pub flood_pos: [i32; 3],
    /// Center of the players' safe zone, exempt from all flood mutation.
    pub safe_pos: Option<[i32; 3]>,
    /// Chebyshev radius of the safe zone.
    pub safe_zone_radius: i32,
    /// Lives each player starts the round with.
    pub start_lives: i32,
    /// Sponges each player may place.
    pub sponges: i32,
    /// Water blocks each player may place.
    pub water_blocks: i32,
    /// Doors each player may place.
    pub doors: i32,
}

impl FloodConfig {
    /// The flood origin as a position.
    #[must_use]
    pub fn flood_pos(&self) -> BlockPos {
        BlockPos::new(self.flood_pos[0], self.flood_pos[1], self.flood_pos[2])
    }

    /// The safe-zone center, if the map has one.
    #[must_use]
    pub fn safe_pos(&self) -> Option<BlockPos> {
        self.safe_pos.map(|[x, y, z]| BlockPos::new(x, y, z))
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            water_round: false,
            flood_upward: false,
            sponge_life: 50,
            spread_delay: 4,
            spawn_protection: true,
            spawn_protection_radius: 5,
            flood_pos: [64, 60, 64],
            safe_pos: None,
            safe_zone_radius: 8,
            start_lives: 3,
            sponges: 10,
            water_blocks: 30,
            doors: 20,
        }
    }
}
