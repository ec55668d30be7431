//! Error types shared by the simulation and the runner.
//!
//! Only user-recoverable failures live here. Broken invariants (a negative
//! timer, more collisions than meteors) are programming defects and are
//! asserted at the mutation site instead.

use thiserror::Error;

use crate::enums::RoundPhase;

/// Rejected round command. The round state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Guess outside `[0, max]`.
    #[error("Please enter a valid guess between 0 and {max} (got {guess}).")]
    InvalidGuess { guess: i64, max: u32 },

    /// Command not allowed in the current phase.
    #[error("cannot {action} while the round is {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: RoundPhase,
    },
}

/// Failure while loading or validating a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
