//! Simulation engine for the meteor-guessing game.
//!
//! Owns the meteor field, collision detection, explosion effects and the
//! round state machine, and produces `RoundSnapshot`s for the display.
//! Completely headless, with time injected by the caller.

pub mod collision;
pub mod effects;
pub mod field;
pub mod round;
pub mod schedule;
pub mod snapshot;
pub mod spawn;

pub use meteor_core as core;
pub use round::RoundController;

#[cfg(test)]
mod tests;
