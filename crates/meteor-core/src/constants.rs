//! Simulation constants and tuning parameters.
//!
//! These are the compiled defaults behind [`crate::config::GameConfig`].

// --- Timing ---

/// Nominal animation-frame period in milliseconds (~60 Hz).
pub const FRAME_MS: u64 = 16;

/// Countdown step in milliseconds.
pub const COUNTDOWN_MS: u64 = 1_000;

/// Round length in countdown steps (seconds).
pub const ROUND_DURATION_SECS: u32 = 20;

// --- Playfield ---

/// Playfield width in pixels.
pub const FIELD_WIDTH: f64 = 600.0;

/// Playfield height in pixels.
pub const FIELD_HEIGHT: f64 = 600.0;

/// Planet center (middle of the playfield).
pub const PLANET_CENTER: (f64, f64) = (FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);

// --- Meteors ---

/// Meteors spawned per round.
pub const METEOR_COUNT: u32 = 10;

/// Closest spawn distance from the planet center.
pub const METEOR_MIN_DISTANCE: f64 = 200.0;

/// Farthest spawn distance from the planet center.
pub const METEOR_MAX_DISTANCE: f64 = 250.0;

/// Each velocity component is drawn from [-METEOR_MAX_SPEED, METEOR_MAX_SPEED].
pub const METEOR_MAX_SPEED: f64 = 1.0;

// --- Display sizes (used only to derive the default collision radii) ---

/// Planet sprite diameter in pixels.
pub const PLANET_DISPLAY_DIAMETER: f64 = 150.0 * 1.5;

/// Meteor sprite width in pixels.
pub const METEOR_DISPLAY_WIDTH: f64 = 57.0;

/// Meteor sprite height in pixels.
pub const METEOR_DISPLAY_HEIGHT: f64 = 26.0;

// --- Collision ---

/// Planet collision radius: half the planet display diameter.
pub const PLANET_RADIUS: f64 = PLANET_DISPLAY_DIAMETER / 2.0;

/// Meteor collision radius: half the meteor display height.
pub const METEOR_RADIUS: f64 = METEOR_DISPLAY_HEIGHT / 2.0;

// --- Effects ---

/// Explosion lifetime in milliseconds.
pub const EXPLOSION_TTL_MS: u64 = 1_000;

// --- Guessing ---

/// Largest accepted guess (inclusive). Guesses start at 0.
pub const MAX_GUESS: u32 = 10;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;
