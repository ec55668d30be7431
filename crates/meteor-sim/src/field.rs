//! The meteor field: spawn, per-tick motion and collision marking.

use serde::{Deserialize, Serialize};

use meteor_core::config::FieldConfig;
use meteor_core::types::{Position, Velocity};

use crate::collision::{self, CollisionRadii};
use crate::spawn::MeteorSource;

/// A single meteor. Frozen in place once `collided` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meteor {
    pub position: Position,
    pub velocity: Velocity,
    /// Monotonic: false -> true, never back.
    pub collided: bool,
}

impl Meteor {
    pub fn new(position: Position, velocity: Velocity) -> Self {
        Self {
            position,
            velocity,
            collided: false,
        }
    }
}

/// Owns the meteors for one round.
#[derive(Debug, Clone, Default)]
pub struct MeteorField {
    meteors: Vec<Meteor>,
}

impl MeteorField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field with exactly `config.count` fresh meteors.
    pub fn reset(&mut self, config: &FieldConfig, source: &mut dyn MeteorSource) {
        self.meteors.clear();
        self.meteors.reserve(config.count as usize);
        for _ in 0..config.count {
            let mut meteor = source.next_meteor(config);
            meteor.collided = false;
            self.meteors.push(meteor);
        }
    }

    /// Move every meteor still in flight by `ticks` whole steps.
    pub fn advance(&mut self, ticks: u32) {
        for meteor in self.meteors.iter_mut().filter(|m| !m.collided) {
            for _ in 0..ticks {
                meteor.position.step(&meteor.velocity);
            }
        }
    }

    /// Mark meteors overlapping a planet at `center` as collided.
    ///
    /// Returns the indices of meteors that collided on this call, in index
    /// order. Meteors that collided earlier are never reported again.
    pub fn query_new_collisions(
        &mut self,
        center: Position,
        radii: &CollisionRadii,
    ) -> Vec<usize> {
        let mut hits = Vec::new();
        for (index, meteor) in self.meteors.iter_mut().enumerate() {
            if !meteor.collided
                && collision::is_colliding(meteor, center, radii.planet, radii.meteor)
            {
                meteor.collided = true;
                hits.push(index);
            }
        }
        hits
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn get(&self, index: usize) -> Option<&Meteor> {
        self.meteors.get(index)
    }

    /// Meteors still in flight, with their indices.
    pub fn active_meteors(&self) -> impl Iterator<Item = (usize, &Meteor)> {
        self.meteors.iter().enumerate().filter(|(_, m)| !m.collided)
    }

    pub fn collided_count(&self) -> usize {
        self.meteors.iter().filter(|m| m.collided).count()
    }

    pub fn len(&self) -> usize {
        self.meteors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meteors.is_empty()
    }

    pub fn clear(&mut self) {
        self.meteors.clear();
    }
}
