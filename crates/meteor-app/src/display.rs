//! Display collaborators fed by the game loop.
//!
//! The simulation only says what is where; a `DisplaySink` decides how to
//! show it. `LogDisplay` writes through the `log` facade, which is all the
//! headless runner needs.

use std::sync::mpsc;

use log::{debug, info, trace};

use meteor_core::enums::RoundPhase;
use meteor_core::events::RoundEvent;
use meteor_core::state::{RoundOutcome, RoundSnapshot};

/// Receives frames, readouts and the end-of-round result.
pub trait DisplaySink {
    /// Paint one frame: planet, meteors in flight and live explosions.
    fn render(&mut self, frame: &RoundSnapshot);
    /// Numeric readouts changed.
    fn readout(&mut self, collisions: u32, seconds_left: u32);
    /// Terminal result for the round; offer a reset after this.
    fn round_ended(&mut self, outcome: &RoundOutcome);
}

/// Forward one controller step to the display.
///
/// Renders every running frame plus any idle/ended step that raised events,
/// pushes readouts when a counter changed and reports the outcome once.
pub fn publish(display: &mut dyn DisplaySink, snapshot: &RoundSnapshot) {
    if snapshot.phase == RoundPhase::Running || !snapshot.events.is_empty() {
        display.render(snapshot);
    }

    let readout_changed = snapshot.events.iter().any(|e| {
        matches!(
            e,
            RoundEvent::CollisionCountChanged { .. } | RoundEvent::TimeRemainingChanged { .. }
        )
    });
    if readout_changed {
        display.readout(snapshot.round.collision_count, snapshot.round.time_remaining);
    }

    let ended = snapshot
        .events
        .iter()
        .any(|e| matches!(e, RoundEvent::RoundEnded { .. }));
    if ended {
        if let Some(outcome) = &snapshot.outcome {
            display.round_ended(outcome);
        }
    }
}

/// Writes frames at trace level and readouts/results at info level.
#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u64,
}

impl DisplaySink for LogDisplay {
    fn render(&mut self, frame: &RoundSnapshot) {
        self.frames += 1;
        trace!(
            "frame {}: phase={}, meteors={}, explosions={}",
            self.frames,
            frame.phase,
            frame.meteors.len(),
            frame.explosions.len()
        );
        for explosion in &frame.explosions {
            if explosion.age_ms == 0 {
                debug!(
                    "explosion at ({:.0}, {:.0})",
                    explosion.position.x, explosion.position.y
                );
            }
        }
    }

    fn readout(&mut self, collisions: u32, seconds_left: u32) {
        info!("collisions: {collisions}  time left: {seconds_left}s");
    }

    fn round_ended(&mut self, outcome: &RoundOutcome) {
        info!("{}", outcome.message);
    }
}

/// Wraps another sink and also sends each outcome down a channel.
pub struct NotifyingDisplay<D> {
    inner: D,
    outcomes: mpsc::Sender<RoundOutcome>,
}

impl<D: DisplaySink> NotifyingDisplay<D> {
    pub fn new(inner: D, outcomes: mpsc::Sender<RoundOutcome>) -> Self {
        Self { inner, outcomes }
    }
}

impl<D: DisplaySink> DisplaySink for NotifyingDisplay<D> {
    fn render(&mut self, frame: &RoundSnapshot) {
        self.inner.render(frame);
    }

    fn readout(&mut self, collisions: u32, seconds_left: u32) {
        self.inner.readout(collisions, seconds_left);
    }

    fn round_ended(&mut self, outcome: &RoundOutcome) {
        self.inner.round_ended(outcome);
        // Nobody listening is fine; the round is over either way.
        let _ = self.outcomes.send(outcome.clone());
    }
}
