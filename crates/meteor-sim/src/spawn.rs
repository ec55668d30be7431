//! Meteor spawn factories.
//!
//! A [`MeteorSource`] produces one meteor at a time from the field config.
//! The production source is [`RandomVectorGenerator`]; tests plug in scripted
//! sources to build exact trajectories.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use meteor_core::config::FieldConfig;
use meteor_core::types::{Position, Velocity};

use crate::field::Meteor;

/// Anything that can hand out fresh meteors for a field reset.
pub trait MeteorSource {
    /// Produce the next meteor for a field described by `config`.
    fn next_meteor(&mut self, config: &FieldConfig) -> Meteor;
}

/// Seeded generator for random spawn positions and velocities.
///
/// Positions lie on a ring around `config.center`: angle uniform in
/// `[0, 2π)`, distance uniform in `[min_distance, max_distance]`. Each
/// velocity component is uniform in `[-max_speed, max_speed]`.
pub struct RandomVectorGenerator {
    rng: ChaCha8Rng,
}

impl RandomVectorGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Random point on the spawn ring.
    pub fn position(&mut self, center: Position, min_distance: f64, max_distance: f64) -> Position {
        let angle: f64 = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let distance: f64 = self.rng.gen_range(min_distance..=max_distance);
        center.offset_polar(angle, distance)
    }

    /// Random per-tick velocity with each component in `[-max_speed, max_speed]`.
    pub fn velocity(&mut self, max_speed: f64) -> Velocity {
        let dx: f64 = self.rng.gen_range(-max_speed..=max_speed);
        let dy: f64 = self.rng.gen_range(-max_speed..=max_speed);
        Velocity::new(dx, dy)
    }
}

impl MeteorSource for RandomVectorGenerator {
    fn next_meteor(&mut self, config: &FieldConfig) -> Meteor {
        let position = self.position(config.center, config.min_distance, config.max_distance);
        let velocity = self.velocity(config.max_speed);
        Meteor::new(position, velocity)
    }
}
