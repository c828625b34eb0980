//! Engine error taxonomy.

use basalt_utils::BlockPos;
use thiserror::Error;

/// Errors surfaced by the world engine.
///
/// Every variant is recoverable; nothing here should terminate the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A coordinate fell outside the world grid. The operation was a no-op.
    #[error("position {pos} is outside the world grid")]
    OutOfBounds {
        /// The rejected position.
        pos: BlockPos,
    },

    /// A behavior-override lifecycle call arrived out of order, e.g. a
    /// restore with no matching install. Treated as a programming error in
    /// the caller: logged, and the call is a no-op.
    #[error("{action} called out of lifecycle order")]
    InvalidLifecycle {
        /// The offending lifecycle call.
        action: &'static str,
    },

    /// A bulk block import did not match the grid's volume.
    #[error("block import of {got} cells does not fit a grid of {expected}")]
    GridSizeMismatch {
        /// Cells the grid holds.
        expected: usize,
        /// Cells the caller supplied.
        got: usize,
    },
}
