//! Round state and the snapshot handed to the display after each step.

use serde::{Deserialize, Serialize};

use crate::enums::RoundPhase;
use crate::events::RoundEvent;
use crate::types::{Position, Velocity};

/// Counters for the current round. Owned by the round controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub running: bool,
    /// Meteors that have hit the planet this round. Never decreases.
    pub collision_count: u32,
    /// Whole seconds left on the countdown.
    pub time_remaining: u32,
    /// Player's guess, fixed at start.
    pub guess: u32,
}

/// Final score comparison for a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub guess: u32,
    pub collision_count: u32,
    pub matched: bool,
    pub message: String,
}

impl RoundOutcome {
    /// Compare a guess against the actual collision count.
    pub fn score(guess: u32, collision_count: u32) -> Self {
        let matched = guess == collision_count;
        let message = if matched {
            format!("Well done! Your guess of {guess} was correct!")
        } else {
            format!("Sorry, you guessed {guess}, but {collision_count} actually happened.")
        };
        Self {
            guess,
            collision_count,
            matched,
            message,
        }
    }
}

/// Complete visible state, produced after every controller step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub round: RoundState,
    /// Pending guess shown in the guess widget.
    pub pending_guess: u32,
    pub planet: PlanetView,
    /// Meteors still in flight. Collided meteors are not drawn.
    pub meteors: Vec<MeteorView>,
    pub explosions: Vec<ExplosionView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<RoundEvent>,
    /// Result of the last finished round, until reset.
    pub outcome: Option<RoundOutcome>,
}

/// Planet placement and collision radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetView {
    pub center: Position,
    pub radius: f64,
}

/// A meteor to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeteorView {
    pub index: usize,
    pub position: Position,
    pub velocity: Velocity,
}

/// An explosion marker to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub position: Position,
    /// Milliseconds since the explosion was recorded.
    pub age_ms: u64,
}
