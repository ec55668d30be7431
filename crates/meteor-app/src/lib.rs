//! Headless meteor-guessing application.
//!
//! Runs the round controller on a wall-clock thread and hands each step to
//! a display sink. The `meteor-watch` binary drives it from the command line.

pub mod display;
pub mod game_loop;
pub mod state;

pub use meteor_core as core;
