//! # Basalt Games
//!
//! Game modes that re-skin world physics for the duration of a round by
//! installing their own handlers into a world's behavior table.

pub mod flood;

pub use flood::{FloodConfig, FloodGame, FloodTier};
