//! Planet/meteor collision test.
//!
//! Both bodies are circles. Collision radii are configured directly and are
//! not tied to sprite sizes; [`CollisionRadii::from_display`] is only the
//! formula behind the defaults (half of each display size).

use meteor_core::config::PlanetConfig;
use meteor_core::types::Position;

use crate::field::Meteor;

/// Collision radii for the planet and a meteor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRadii {
    pub planet: f64,
    pub meteor: f64,
}

impl CollisionRadii {
    pub fn new(planet: f64, meteor: f64) -> Self {
        Self { planet, meteor }
    }

    /// Half the planet diameter and half the meteor sprite height.
    pub fn from_display(planet_diameter: f64, meteor_height: f64) -> Self {
        Self::new(planet_diameter / 2.0, meteor_height / 2.0)
    }

    pub fn from_config(config: &PlanetConfig) -> Self {
        Self::new(config.radius, config.meteor_radius)
    }

    /// Center distance below which the two circles overlap.
    pub fn planned(&self) -> f64 {
        self.planet + self.meteor
    }
}

/// True when `point` lies strictly inside `radius` of `center`.
#[inline]
pub fn within_radius(point: Position, center: Position, radius: f64) -> bool {
    point.distance_to(&center) < radius
}

/// True when the meteor overlaps the planet. Touching does not count.
pub fn is_colliding(
    meteor: &Meteor,
    planet_center: Position,
    planet_radius: f64,
    meteor_radius: f64,
) -> bool {
    within_radius(meteor.position, planet_center, planet_radius + meteor_radius)
}
