//! Runtime configuration, optionally loaded from a TOML file.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! file only needs the keys it overrides:
//!
//! ```toml
//! seed = 7
//!
//! [planet]
//! radius = 90.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::Position;

/// Meteor spawn parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Meteors spawned per round.
    pub count: u32,
    /// Spawn ring center.
    pub center: Position,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Bound for each velocity component, in pixels per tick.
    pub max_speed: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: METEOR_COUNT,
            center: Position::new(PLANET_CENTER.0, PLANET_CENTER.1),
            min_distance: METEOR_MIN_DISTANCE,
            max_distance: METEOR_MAX_DISTANCE,
            max_speed: METEOR_MAX_SPEED,
        }
    }
}

/// Collision geometry. Radii are explicit and independent of sprite sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub center: Position,
    /// Planet collision radius.
    pub radius: f64,
    /// Meteor collision radius.
    pub meteor_radius: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            center: Position::new(PLANET_CENTER.0, PLANET_CENTER.1),
            radius: PLANET_RADIUS,
            meteor_radius: METEOR_RADIUS,
        }
    }
}

/// Round rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Countdown length in seconds.
    pub duration_secs: u32,
    /// Largest accepted guess (inclusive).
    pub max_guess: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration_secs: ROUND_DURATION_SECS,
            max_guess: MAX_GUESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Explosion lifetime in milliseconds.
    pub ttl_ms: u64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            ttl_ms: EXPLOSION_TTL_MS,
        }
    }
}

/// Scheduler cadences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub frame_ms: u64,
    pub countdown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: FRAME_MS,
            countdown_ms: COUNTDOWN_MS,
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed. Same seed = same meteor fields.
    pub seed: u64,
    pub field: FieldConfig,
    pub planet: PlanetConfig,
    pub round: RoundConfig,
    pub effects: EffectConfig,
    pub timing: TimingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            field: FieldConfig::default(),
            planet: PlanetConfig::default(),
            round: RoundConfig::default(),
            effects: EffectConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        if field.count == 0 {
            return Err(ConfigError::Invalid("field.count must be > 0".into()));
        }
        if field.min_distance < 0.0 || field.min_distance > field.max_distance {
            return Err(ConfigError::Invalid(format!(
                "field distance range [{}, {}] is empty or negative",
                field.min_distance, field.max_distance
            )));
        }
        if field.max_speed < 0.0 {
            return Err(ConfigError::Invalid("field.max_speed must be >= 0".into()));
        }
        if self.planet.radius <= 0.0 || self.planet.meteor_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "planet.radius and planet.meteor_radius must be > 0".into(),
            ));
        }
        if self.round.duration_secs == 0 {
            return Err(ConfigError::Invalid("round.duration_secs must be > 0".into()));
        }
        if self.timing.frame_ms == 0 || self.timing.countdown_ms == 0 {
            return Err(ConfigError::Invalid("timing periods must be > 0".into()));
        }
        Ok(())
    }
}
