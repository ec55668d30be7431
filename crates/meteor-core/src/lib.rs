//! Core types and definitions for the meteor-guessing simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! commands, events, state snapshots, configuration, errors and constants.
//! It has no dependency on any runtime or display framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
