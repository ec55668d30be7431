//! Player commands sent from the display layer to the round controller.
//!
//! Commands are edge-triggered: one command per user action. Queued commands
//! are applied at the next scheduler boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundCommand {
    // --- Guess entry (idle only) ---
    /// Raise the pending guess by one (saturates at the maximum).
    IncreaseGuess,
    /// Lower the pending guess by one (saturates at zero).
    DecreaseGuess,
    /// Replace the pending guess. Validated like `Start`.
    SetGuess { guess: i64 },

    // --- Round control ---
    /// Start a round. `None` uses the pending guess.
    Start { guess: Option<i64> },
    /// Return from a finished round to idle.
    Reset,
}
