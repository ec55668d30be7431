//! Events emitted by the round controller for readouts and messaging.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Something the display should react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundEvent {
    /// Pending guess changed while idle.
    GuessChanged { guess: u32 },
    /// A round began with the given guess.
    RoundStarted { guess: u32 },
    /// A meteor hit the planet this tick.
    MeteorCollided { index: usize, position: Position },
    /// Collision readout changed.
    CollisionCountChanged { count: u32 },
    /// Countdown readout changed.
    TimeRemainingChanged { seconds: u32 },
    /// Terminal event for a round.
    RoundEnded {
        guess: u32,
        collision_count: u32,
        matched: bool,
        message: String,
    },
    /// Round returned to idle; start is available again.
    RoundReset,
}
