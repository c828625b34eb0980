//! Minimal player handle at the engine boundary.
//!
//! Sessions, authentication and packet framing live outside this crate; the
//! engine only needs an identity, the referee flag, and somewhere to put
//! user-facing messages for the session layer to flush.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use uuid::Uuid;

/// A connected player as the engine sees one.
pub struct Player {
    /// Display name.
    pub name: String,
    /// Stable identity.
    pub id: Uuid,
    referee: AtomicBool,
    outbox: Mutex<VecDeque<String>>,
}

impl Player {
    /// Creates a player handle with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Uuid::new_v4(),
            referee: AtomicBool::new(false),
            outbox: Mutex::new(VecDeque::new()),
        }
    }

    /// Referees bypass placement budgets.
    #[must_use]
    pub fn is_referee(&self) -> bool {
        self.referee.load(Ordering::Relaxed)
    }

    /// Grants or revokes referee status.
    pub fn set_referee(&self, referee: bool) {
        self.referee.store(referee, Ordering::Relaxed);
    }

    /// Queues a user-facing message for the session layer.
    pub fn message(&self, text: impl Into<String>) {
        self.outbox.lock().push_back(text.into());
    }

    /// Takes all queued messages, oldest first.
    #[must_use]
    pub fn drain_messages(&self) -> Vec<String> {
        self.outbox.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_drain_in_order() {
        let player = Player::new("op_hannah");
        player.message("first");
        player.message("second");
        assert_eq!(player.drain_messages(), vec!["first", "second"]);
        assert!(player.drain_messages().is_empty());
    }
}
