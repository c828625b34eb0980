//! Server configuration.

use std::{fs, path::Path, sync::LazyLock};

use serde::Deserialize;

use crate::physics::MAX_PHYSICS_LEVEL;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/basalt_config.json5");

/// Lazily loaded server configuration.
pub static BASALT_CONFIG: LazyLock<ServerConfig> = LazyLock::new(ServerConfig::load_or_create);

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Milliseconds between physics ticks.
    pub physics_interval_ms: u64,
    /// Cap on pending checks evaluated per world per tick.
    pub max_checks_per_tick: usize,
    /// Physics level worlds boot with unless they override it.
    pub default_physics_level: u8,
    /// Evaluations a lava cell waits between spread steps.
    pub lava_spread_delay: u8,
    /// Worlds to bring up at boot.
    pub worlds: Vec<WorldConfig>,
}

/// Per-world boot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    /// World name.
    pub name: String,
    /// Grid x extent.
    pub width: u16,
    /// Grid y extent.
    pub height: u16,
    /// Grid z extent.
    pub length: u16,
    /// Seed for the world-local random source; omitted means entropy.
    pub seed: Option<u64>,
    /// Physics level override for this world.
    pub physics_level: Option<u8>,
}

/// Engine settings one world runs with, derived from [`ServerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct WorldSettings {
    /// Cap on pending checks evaluated per tick.
    pub max_checks_per_tick: usize,
    /// Evaluations a lava cell waits between spread steps.
    pub lava_spread_delay: u8,
    /// Seed for the world-local random source.
    pub seed: Option<u64>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            max_checks_per_tick: 2000,
            lava_spread_delay: 4,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Loads the config file, writing the packaged default on first run.
    ///
    /// # Panics
    /// Panics if the config directory cannot be created or the config file
    /// cannot be read, parsed or written; the server cannot come up
    /// without one.
    #[must_use]
    pub fn load_or_create() -> Self {
        let path = Path::new("config/basalt_config.json5");

        if path.exists() {
            let config_str = fs::read_to_string(path).expect("config file unreadable");
            let config: ServerConfig =
                serde_json5::from_str(&config_str).expect("config file malformed");
            config.validate().expect("config file invalid");
            config
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("cannot create config directory");
            }
            fs::write(path, DEFAULT_CONFIG).expect("cannot write default config");
            Self::default()
        }
    }

    /// Rejects out-of-range values before they reach the engine.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(20..=10_000).contains(&self.physics_interval_ms) {
            return Err("Physics interval must be in range 20..=10000 ms");
        }
        if !(1..=1_000_000).contains(&self.max_checks_per_tick) {
            return Err("Max checks per tick must be in range 1..=1000000");
        }
        if self.default_physics_level > MAX_PHYSICS_LEVEL {
            return Err("Physics level must be in range 0..=5");
        }
        for world in &self.worlds {
            if world.width == 0 || world.height == 0 || world.length == 0 {
                return Err("World dimensions must be non-zero");
            }
            if let Some(level) = world.physics_level
                && level > MAX_PHYSICS_LEVEL
            {
                return Err("Physics level must be in range 0..=5");
            }
        }
        Ok(())
    }

    /// Engine settings for one configured world.
    #[must_use]
    pub fn world_settings(&self, world: &WorldConfig) -> WorldSettings {
        WorldSettings {
            max_checks_per_tick: self.max_checks_per_tick,
            lava_spread_delay: self.lava_spread_delay,
            seed: world.seed,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            physics_interval_ms: 250,
            max_checks_per_tick: 2000,
            default_physics_level: 1,
            lava_spread_delay: 4,
            worlds: vec![WorldConfig {
                name: "main".to_string(),
                width: 128,
                height: 64,
                length: 128,
                seed: None,
                physics_level: None,
            }],
        }
    }
}
