//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Round phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the player to lock in a guess and start.
    #[default]
    Idle,
    /// Meteors in flight, countdown ticking.
    Running,
    /// Countdown expired; result available until reset.
    Ended,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Running => "running",
            RoundPhase::Ended => "ended",
        };
        f.write_str(name)
    }
}
