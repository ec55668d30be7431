//! Snapshot builder: turns controller state into a `RoundSnapshot`.
//!
//! Read-only. It never modifies the field or the effect list.

use std::time::Duration;

use meteor_core::enums::RoundPhase;
use meteor_core::events::RoundEvent;
use meteor_core::state::*;

use crate::effects::EffectTracker;
use crate::field::MeteorField;

/// Build a complete snapshot of the round.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    phase: RoundPhase,
    round: RoundState,
    pending_guess: u32,
    planet: PlanetView,
    field: &MeteorField,
    effects: &EffectTracker,
    now: Duration,
    events: Vec<RoundEvent>,
    outcome: Option<RoundOutcome>,
) -> RoundSnapshot {
    RoundSnapshot {
        phase,
        round,
        pending_guess,
        planet,
        meteors: build_meteors(field),
        explosions: build_explosions(effects, now),
        events,
        outcome,
    }
}

/// Meteors still in flight.
fn build_meteors(field: &MeteorField) -> Vec<MeteorView> {
    field
        .active_meteors()
        .map(|(index, meteor)| MeteorView {
            index,
            position: meteor.position,
            velocity: meteor.velocity,
        })
        .collect()
}

fn build_explosions(effects: &EffectTracker, now: Duration) -> Vec<ExplosionView> {
    effects
        .active_effects()
        .iter()
        .map(|e| ExplosionView {
            position: e.position,
            age_ms: e.age(now).as_millis() as u64,
        })
        .collect()
}
