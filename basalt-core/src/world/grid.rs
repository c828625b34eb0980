//! Flat block storage for one world.

use basalt_registry::blocks;
use basalt_utils::{BlockId, BlockPos};

use crate::error::WorldError;

/// The block grid of a world: a flat array indexed by
/// `(y * length + z) * width + x`.
///
/// Dimensions are fixed for the grid's lifetime; the index↔coordinate
/// mapping is a total bijection over the valid range.
pub struct Grid {
    width: u16,
    height: u16,
    length: u16,
    blocks: Vec<BlockId>,
}

impl Grid {
    /// Creates an air-filled grid of the given dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16, length: u16) -> Self {
        let volume = usize::from(width) * usize::from(height) * usize::from(length);
        Self {
            width,
            height,
            length,
            blocks: vec![blocks::AIR; volume],
        }
    }

    /// Grid width (x extent).
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height (y extent).
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Grid length (z extent).
    #[must_use]
    pub const fn length(&self) -> u16 {
        self.length
    }

    /// Total number of cells.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        let v = pos.0;
        v.x >= 0
            && v.y >= 0
            && v.z >= 0
            && v.x < i32::from(self.width)
            && v.y < i32::from(self.height)
            && v.z < i32::from(self.length)
    }

    /// Converts a position to its flat index.
    pub fn index(&self, pos: BlockPos) -> Result<u32, WorldError> {
        if !self.contains(pos) {
            return Err(WorldError::OutOfBounds { pos });
        }
        let v = pos.0;
        let idx = (i64::from(v.y) * i64::from(self.length) + i64::from(v.z))
            * i64::from(self.width)
            + i64::from(v.x);
        Ok(idx as u32)
    }

    /// Converts a flat index back to its position.
    #[must_use]
    pub fn pos_of(&self, index: u32) -> BlockPos {
        let width = i64::from(self.width);
        let length = i64::from(self.length);
        let idx = i64::from(index);
        let x = idx % width;
        let z = (idx / width) % length;
        let y = idx / (width * length);
        BlockPos::new(x as i32, y as i32, z as i32)
    }

    /// Reads the block at a position.
    pub fn get(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        let index = self.index(pos)?;
        Ok(self.blocks[index as usize])
    }

    /// Writes the block at a position, returning the previous block.
    pub fn set(&mut self, pos: BlockPos, block: BlockId) -> Result<BlockId, WorldError> {
        let index = self.index(pos)?;
        Ok(self.set_index(index, block))
    }

    /// Reads the block at a flat index.
    ///
    /// Indices come from [`Grid::index`], which bounds-checks; the grid
    /// never changes size, so stored indices stay valid.
    #[must_use]
    pub fn block_at(&self, index: u32) -> BlockId {
        self.blocks[index as usize]
    }

    /// Writes the block at a flat index, returning the previous block.
    pub fn set_index(&mut self, index: u32, block: BlockId) -> BlockId {
        let slot = &mut self.blocks[index as usize];
        std::mem::replace(slot, block)
    }

    /// Copies the full block array out for the persistence layer.
    #[must_use]
    pub fn export_blocks(&self) -> Vec<BlockId> {
        self.blocks.clone()
    }

    /// Replaces the full block array from the persistence layer.
    ///
    /// The incoming array must match the grid's volume exactly.
    pub fn import_blocks(&mut self, incoming: &[BlockId]) -> Result<(), WorldError> {
        if incoming.len() != self.blocks.len() {
            return Err(WorldError::GridSizeMismatch {
                expected: self.blocks.len(),
                got: incoming.len(),
            });
        }
        self.blocks.copy_from_slice(incoming);
        Ok(())
    }
}
