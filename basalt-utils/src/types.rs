//! Wrapper types making it harder to accidentally use the wrong underlying type.

use std::fmt::{self, Display};

use crate::math::Vector3;

/// A raw block id. The registry derives a block's name and static properties
/// from this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A block position.
///
/// Components are signed so that neighbor offsets below the world floor or
/// past an edge stay representable; the grid's bounds check rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a position from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Returns the position offset by the given deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self(Vector3::new(self.0.x + dx, self.0.y + dy, self.0.z + dz))
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_components() {
        let pos = BlockPos::new(4, 8, 15);
        assert_eq!(pos.offset(1, -1, 0), BlockPos::new(5, 7, 15));
        assert_eq!(pos.offset(0, 0, -16), BlockPos::new(4, 8, -1));
    }
}
