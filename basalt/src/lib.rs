//! # Basalt
//!
//! Server glue for the Basalt world engine: boots the configured worlds,
//! runs one scheduler task per world, and hosts game-mode controllers. The
//! network/session layer drives placements through [`basalt_core::World`];
//! this crate owns process lifecycle.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::select;
use tokio_util::sync::CancellationToken;

use basalt_core::World;
use basalt_core::WorldError;
use basalt_core::config::ServerConfig;
use basalt_games::{FloodConfig, FloodGame};

/// The logging module.
pub mod logger;

/// The main server struct.
pub struct BasaltServer {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    config: ServerConfig,
    worlds: Vec<Arc<World>>,
    games: Mutex<Vec<FloodGame>>,
}

impl BasaltServer {
    /// Builds the server and its worlds from a validated configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let worlds: Vec<Arc<World>> = config
            .worlds
            .iter()
            .map(|wc| {
                let world = World::new(
                    wc.name.clone(),
                    wc.width,
                    wc.height,
                    wc.length,
                    config.world_settings(wc),
                );
                world.set_physics_level(wc.physics_level.unwrap_or(config.default_physics_level));
                log::info!(
                    "world \"{}\" up ({}x{}x{}, physics {})",
                    wc.name,
                    wc.width,
                    wc.height,
                    wc.length,
                    world.physics_level()
                );
                Arc::new(world)
            })
            .collect();

        Self {
            cancel_token: CancellationToken::new(),
            config,
            worlds,
            games: Mutex::new(Vec::new()),
        }
    }

    /// Looks up a world by name.
    #[must_use]
    pub fn world(&self, name: &str) -> Option<Arc<World>> {
        self.worlds.iter().find(|w| w.name() == name).cloned()
    }

    /// Spawns one scheduler task per world at the configured cadence.
    ///
    /// Worlds tick independently of each other; each task exits when the
    /// cancellation token fires.
    pub fn start(&self) {
        for world in &self.worlds {
            let world = Arc::clone(world);
            let cancel = self.cancel_token.clone();
            let interval_ms = self.config.physics_interval_ms;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    select! {
                        () = cancel.cancelled() => break,
                        _ = interval.tick() => world.tick(),
                    }
                }
                log::debug!("scheduler for \"{}\" detached", world.name());
            });
        }
        log::info!("started {} world scheduler(s)", self.worlds.len());
    }

    /// Starts a flood round on the named world.
    ///
    /// One round per world at a time; the command layer calls this.
    pub fn start_flood(&self, world_name: &str, config: FloodConfig) -> Result<(), WorldError> {
        let Some(world) = self.world(world_name) else {
            log::warn!("flood start on unknown world \"{world_name}\"");
            return Err(WorldError::InvalidLifecycle {
                action: "flood start on unknown world",
            });
        };

        let mut games = self.games.lock();
        if games.iter().any(|g| g.is_running()) {
            return Err(WorldError::InvalidLifecycle {
                action: "flood start while a round is running",
            });
        }
        let mut game = FloodGame::new(world, config);
        game.start()?;
        games.push(game);
        Ok(())
    }

    /// Ends the running flood round, if any.
    pub fn end_flood(&self) -> Result<(), WorldError> {
        let mut games = self.games.lock();
        let Some(mut game) = games.pop() else {
            return Err(WorldError::InvalidLifecycle {
                action: "flood end without a round",
            });
        };
        game.end()
    }

    /// Stops the schedulers and tears the worlds down.
    pub fn stop(&self) {
        self.cancel_token.cancel();
        let mut games = self.games.lock();
        for game in games.iter_mut() {
            if game.is_running() {
                let _ = game.end();
            }
        }
        games.clear();
        for world in &self.worlds {
            world.shutdown();
        }
        log::info!("server stopped");
    }
}
