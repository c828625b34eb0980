//! # Basalt Utils
//!
//! Shared wrapper types, math primitives and the world-local random source
//! used across the Basalt crates.

pub mod math;
pub mod random;
pub mod types;

pub use random::PhysRandom;
pub use types::{BlockId, BlockPos};
