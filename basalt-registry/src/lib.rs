//! # Basalt Registry
//!
//! The block palette and the per-block static property table. Worlds copy
//! the default property table at creation so game modes can tweak their own
//! copy without affecting other worlds.

pub mod blocks;
pub mod props;

pub use props::{BlockProps, default_props};
