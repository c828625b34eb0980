//! # Basalt Core
//!
//! The world physics engine: the per-world grid store, the pending-check
//! queue and its scheduler, the runtime-mutable block behavior table, and
//! the built-in liquid/sponge/falling physics.
//!
//! Network sessions, persistence formats and command dispatch live outside
//! this crate; they drive it through [`World`]'s placement and lifecycle
//! surface.

pub mod behavior;
pub mod config;
pub mod error;
pub mod events;
pub mod physics;
pub mod player;
pub mod world;

pub use behavior::ChangeResult;
pub use error::WorldError;
pub use world::World;
