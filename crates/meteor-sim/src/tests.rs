//! Tests for the round controller: state machine, scoring, timing and determinism.

use std::time::Duration;

use meteor_core::commands::RoundCommand;
use meteor_core::config::{FieldConfig, GameConfig};
use meteor_core::enums::RoundPhase;
use meteor_core::error::RoundError;
use meteor_core::events::RoundEvent;
use meteor_core::state::RoundSnapshot;
use meteor_core::types::{Position, Velocity};

use crate::field::Meteor;
use crate::round::RoundController;
use crate::spawn::MeteorSource;

const FRAME_MS: u64 = 16;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Hands out a fixed list of meteors, cycling if asked for more.
struct ScriptedSource {
    meteors: Vec<Meteor>,
    next: usize,
}

impl MeteorSource for ScriptedSource {
    fn next_meteor(&mut self, _config: &FieldConfig) -> Meteor {
        let meteor = self.meteors[self.next % self.meteors.len()];
        self.next += 1;
        meteor
    }
}

/// `total` meteors on a 200px ring at 4px/tick. The first `hits` fly straight
/// at the planet and collide on frame 19; the rest fly straight out.
fn engineered(hits: usize, total: usize) -> ScriptedSource {
    let center = Position::new(300.0, 300.0);
    let meteors = (0..total)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / total as f64;
            let position = center.offset_polar(angle, 200.0);
            let inward = if i < hits { -4.0 } else { 4.0 };
            let velocity = Velocity::new(angle.cos() * inward, angle.sin() * inward);
            Meteor::new(position, velocity)
        })
        .collect();
    ScriptedSource { meteors, next: 0 }
}

fn stationary(total: usize) -> ScriptedSource {
    engineered(0, total).with_speed(0.0)
}

impl ScriptedSource {
    fn with_speed(mut self, scale: f64) -> Self {
        for m in &mut self.meteors {
            m.velocity = Velocity::new(m.velocity.dx * scale, m.velocity.dy * scale);
        }
        self
    }
}

fn controller(source: ScriptedSource) -> RoundController {
    RoundController::with_source(GameConfig::default(), source)
}

/// Step one frame period at a time from `start_ms` until the round ends.
/// Returns every event raised along the way and the final clock.
fn run_to_end(c: &mut RoundController, start_ms: u64) -> (Vec<RoundEvent>, u64) {
    let mut t = start_ms;
    let mut events = Vec::new();
    while c.phase() == RoundPhase::Running {
        t += FRAME_MS;
        events.extend(c.advance_to(ms(t)).events);
        assert!(t <= 25_000, "round did not end");
    }
    (events, t)
}

/// Advance frame by frame through `first..=last`, returning the last snapshot.
fn step_frames(c: &mut RoundController, first: u64, last: u64) -> RoundSnapshot {
    let mut snap = c.take_snapshot();
    for frame in first..=last {
        snap = c.advance_to(ms(frame * FRAME_MS));
    }
    snap
}

fn ended_event(events: &[RoundEvent]) -> Option<(u32, u32, bool, String)> {
    events.iter().find_map(|e| match e {
        RoundEvent::RoundEnded {
            guess,
            collision_count,
            matched,
            message,
        } => Some((*guess, *collision_count, *matched, message.clone())),
        _ => None,
    })
}

// ---- End-to-end scoring ----

#[test]
fn test_exact_guess_scores_correct() {
    let mut c = controller(engineered(5, 10));
    c.start(5).unwrap();

    step_frames(&mut c, 1, 20);
    assert_eq!(c.round().collision_count, 5);
    assert_eq!(c.phase(), RoundPhase::Running);

    let (events, _) = run_to_end(&mut c, 20 * FRAME_MS);
    let (guess, count, matched, message) = ended_event(&events).expect("RoundEnded emitted");
    assert_eq!((guess, count), (5, 5));
    assert!(matched);
    assert!(message.contains("correct"), "message was: {message}");
    assert!(c.outcome().unwrap().matched);
}

#[test]
fn test_wrong_guess_reports_both_numbers() {
    let mut c = controller(engineered(7, 10));
    c.start(3).unwrap();
    let (events, _) = run_to_end(&mut c, 0);

    let (guess, count, matched, message) = ended_event(&events).expect("RoundEnded emitted");
    assert_eq!((guess, count), (3, 7));
    assert!(!matched);
    assert!(message.contains('3') && message.contains('7'), "message was: {message}");
}

#[test]
fn test_invalid_guess_leaves_round_idle() {
    for bad in [-1, 11, i64::MAX, i64::MIN] {
        let mut c = controller(engineered(5, 10));
        let before = c.snapshot();

        let err = c.start(bad).unwrap_err();
        assert_eq!(err, RoundError::InvalidGuess { guess: bad, max: 10 });
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert_eq!(c.round().collision_count, 0);
        assert!(!c.is_frame_active());
        assert!(!c.is_countdown_active());
        assert_eq!(c.snapshot().meteors, before.meteors);
    }
}

#[test]
fn test_guess_bounds_are_inclusive() {
    let mut c = controller(stationary(10));
    assert!(c.start(0).is_ok());

    let mut c = controller(stationary(10));
    assert!(c.start(10).is_ok());
}

// ---- Countdown ----

#[test]
fn test_countdown_ends_round_after_twenty_steps() {
    let mut c = controller(stationary(10));
    c.start(4).unwrap();
    assert_eq!(c.round().time_remaining, 20);

    for step in 1..=20u32 {
        assert_eq!(c.phase(), RoundPhase::Running);
        c.tick_countdown();
        assert_eq!(c.round().time_remaining, 20 - step);
    }
    assert_eq!(c.phase(), RoundPhase::Ended);
    assert_eq!(c.round().collision_count, 0);
    assert!(!c.round().running);

    // Further countdown steps are ignored once ended.
    c.tick_countdown();
    assert_eq!(c.round().time_remaining, 0);
}

#[test]
fn test_round_lasts_twenty_seconds_of_clock() {
    let mut c = controller(engineered(10, 10));
    c.start(10).unwrap();
    c.advance_to(ms(0));
    c.advance_to(ms(19_999));
    assert_eq!(c.phase(), RoundPhase::Running);
    assert_eq!(c.round().time_remaining, 1);

    let snap = c.advance_to(ms(20_000));
    assert_eq!(snap.phase, RoundPhase::Ended);
    assert_eq!(snap.round.time_remaining, 0);
}

#[test]
fn test_countdown_events_emitted_each_second() {
    let mut c = controller(stationary(10));
    c.start(0).unwrap();
    c.take_snapshot();

    let (events, _) = run_to_end(&mut c, 0);
    let readouts: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            RoundEvent::TimeRemainingChanged { seconds } => Some(*seconds),
            _ => None,
        })
        .collect();
    assert_eq!(readouts, (0..20).rev().collect::<Vec<u32>>());
}

// ---- Cancellation ----

#[test]
fn test_no_frames_after_round_ends() {
    let mut c = controller(engineered(2, 10));
    c.start(2).unwrap();
    let (_, t) = run_to_end(&mut c, 0);

    assert!(!c.is_frame_active());
    assert!(!c.is_countdown_active());
    assert_eq!(c.next_deadline(), None);

    let frames = c.frames();
    let positions: Vec<Position> = c.field().meteors().iter().map(|m| m.position).collect();

    for step in 1..=200 {
        c.advance_to(ms(t + step * FRAME_MS));
    }
    c.tick_frame(ms(t + 10_000));

    assert_eq!(c.frames(), frames);
    let after: Vec<Position> = c.field().meteors().iter().map(|m| m.position).collect();
    assert_eq!(positions, after);
}

#[test]
fn test_explicit_end_cancels_both_loops() {
    let mut c = controller(stationary(10));
    c.start(1).unwrap();
    step_frames(&mut c, 1, 5);

    let outcome = c.end().unwrap();
    assert_eq!(outcome.collision_count, 0);
    assert!(!outcome.matched);
    assert!(!c.is_frame_active());
    assert!(!c.is_countdown_active());

    assert_eq!(
        c.end().unwrap_err(),
        RoundError::InvalidPhase {
            action: "end",
            phase: RoundPhase::Ended
        }
    );
}

// ---- Invariants ----

#[test]
fn test_collision_count_monotonic_and_bounded() {
    for seed in 0..10 {
        let config = GameConfig {
            seed,
            ..Default::default()
        };
        let mut c = RoundController::new(config);
        c.start(5).unwrap();

        let mut last = 0;
        let mut t = 0;
        while c.phase() == RoundPhase::Running {
            t += FRAME_MS;
            let snap = c.advance_to(ms(t));
            assert!(snap.round.collision_count >= last);
            assert!(snap.round.collision_count <= 10);
            assert_eq!(
                snap.round.collision_count as usize,
                c.field().collided_count()
            );
            assert_eq!(
                snap.meteors.len() + snap.round.collision_count as usize,
                10
            );
            last = snap.round.collision_count;
        }
    }
}

#[test]
fn test_meteor_count_constant_per_round() {
    let mut c = RoundController::new(GameConfig::default());
    assert_eq!(c.field().len(), 10);
    c.start(5).unwrap();
    assert_eq!(c.field().len(), 10);
    run_to_end(&mut c, 0);
    assert_eq!(c.field().len(), 10);
    c.reset().unwrap();
    assert_eq!(c.field().len(), 10);
}

// ---- Explosions ----

#[test]
fn test_explosion_recorded_at_impact_and_expires() {
    let mut c = controller(engineered(1, 10));
    c.start(1).unwrap();

    // Meteor 0 collides on frame 19 (t = 304ms).
    let snap = step_frames(&mut c, 1, 18);
    assert!(snap.explosions.is_empty());

    let snap = c.advance_to(ms(19 * FRAME_MS));
    assert_eq!(snap.explosions.len(), 1);
    let impact = c.field().meteors()[0].position;
    assert_eq!(snap.explosions[0].position, impact);
    assert!(snap.events.contains(&RoundEvent::MeteorCollided {
        index: 0,
        position: impact
    }));
    assert!(snap
        .events
        .contains(&RoundEvent::CollisionCountChanged { count: 1 }));

    // 304 + 992 = 1296: still alive. 304 + 1008 = 1312: pruned.
    let snap = step_frames(&mut c, 20, 81);
    assert_eq!(snap.explosions.len(), 1);
    assert_eq!(snap.explosions[0].age_ms, 992);

    let snap = c.advance_to(ms(82 * FRAME_MS));
    assert!(snap.explosions.is_empty());
}

#[test]
fn test_explosion_expires_after_round_ends() {
    let mut c = controller(engineered(1, 10));
    c.start(1).unwrap();
    step_frames(&mut c, 1, 19);
    assert_eq!(c.effects().len(), 1);

    c.end().unwrap();
    let snap = c.advance_to(ms(304 + 999));
    assert_eq!(snap.explosions.len(), 1);
    assert_eq!(snap.explosions[0].age_ms, 999);

    let snap = c.advance_to(ms(304 + 1_000));
    assert!(snap.explosions.is_empty());
    assert!(c.effects().is_empty());

    let snap = c.advance_to(ms(60_000));
    assert!(snap.explosions.is_empty());
}

#[test]
fn test_collided_meteors_hidden_from_snapshot() {
    let mut c = controller(engineered(3, 10));
    c.start(3).unwrap();
    let snap = step_frames(&mut c, 1, 19);
    assert_eq!(snap.meteors.len(), 7);
    assert!(snap.meteors.iter().all(|m| m.index >= 3));
}

// ---- Reset ----

#[test]
fn test_reset_returns_to_idle() {
    let mut c = controller(engineered(4, 10));
    c.increase_guess().unwrap();
    c.start(4).unwrap();
    run_to_end(&mut c, 0);
    assert_eq!(c.round().collision_count, 4);

    c.reset().unwrap();
    assert_eq!(c.phase(), RoundPhase::Idle);
    assert_eq!(c.round().collision_count, 0);
    assert_eq!(c.round().time_remaining, 20);
    assert_eq!(c.pending_guess(), 0);
    assert!(c.outcome().is_none());
    assert!(c.effects().is_empty());
    assert_eq!(c.field().collided_count(), 0);

    let snap = c.take_snapshot();
    assert!(snap.events.contains(&RoundEvent::RoundReset));

    // Start is available again.
    assert!(c.start(2).is_ok());
}

#[test]
fn test_reset_rejected_while_running() {
    let mut c = controller(stationary(10));
    c.start(1).unwrap();
    let err = c.reset().unwrap_err();
    assert_eq!(
        err,
        RoundError::InvalidPhase {
            action: "reset",
            phase: RoundPhase::Running
        }
    );
    assert_eq!(c.phase(), RoundPhase::Running);
    assert!(c.is_frame_active());
}

#[test]
fn test_start_rejected_unless_idle() {
    let mut c = controller(stationary(10));
    c.start(1).unwrap();
    assert!(matches!(
        c.start(2),
        Err(RoundError::InvalidPhase { action: "start", .. })
    ));
    assert_eq!(c.round().guess, 1);

    c.end().unwrap();
    assert!(matches!(
        c.start(2),
        Err(RoundError::InvalidPhase {
            phase: RoundPhase::Ended,
            ..
        })
    ));
}

#[test]
fn test_reset_twice_in_idle_keeps_field_shape() {
    let mut c = RoundController::new(GameConfig::default());
    let config = c.config().field.clone();
    for _ in 0..2 {
        c.reset().unwrap();
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert_eq!(c.field().len(), config.count as usize);
        for m in c.field().meteors() {
            let d = m.position.distance_to(&config.center);
            assert!(d >= config.min_distance - 1e-9 && d <= config.max_distance + 1e-9);
            assert!(m.velocity.dx.abs() <= config.max_speed);
            assert!(m.velocity.dy.abs() <= config.max_speed);
        }
    }
}

// ---- Guess entry & commands ----

#[test]
fn test_guess_adjustment_saturates() {
    let mut c = controller(stationary(10));
    c.decrease_guess().unwrap();
    assert_eq!(c.pending_guess(), 0);

    for _ in 0..15 {
        c.increase_guess().unwrap();
    }
    assert_eq!(c.pending_guess(), 10);

    c.decrease_guess().unwrap();
    assert_eq!(c.pending_guess(), 9);
}

#[test]
fn test_guess_locked_while_running() {
    let mut c = controller(stationary(10));
    c.set_guess(6).unwrap();
    c.start(6).unwrap();
    assert!(c.increase_guess().is_err());
    assert!(c.set_guess(2).is_err());
    assert_eq!(c.round().guess, 6);
}

#[test]
fn test_queued_start_uses_pending_guess() {
    let mut c = controller(engineered(3, 10));
    c.queue_commands([
        RoundCommand::IncreaseGuess,
        RoundCommand::IncreaseGuess,
        RoundCommand::IncreaseGuess,
        RoundCommand::Start { guess: None },
    ]);
    let snap = c.advance_to(ms(0));
    assert_eq!(snap.phase, RoundPhase::Running);
    assert_eq!(snap.round.guess, 3);
    assert!(snap.events.contains(&RoundEvent::RoundStarted { guess: 3 }));

    let (events, _) = run_to_end(&mut c, 0);
    assert!(ended_event(&events).unwrap().2);
}

#[test]
fn test_queued_invalid_start_is_dropped() {
    let mut c = controller(stationary(10));
    c.queue_command(RoundCommand::Start { guess: Some(42) });
    let snap = c.advance_to(ms(100));
    assert_eq!(snap.phase, RoundPhase::Idle);
    assert!(!c.is_frame_active());
}

#[test]
fn test_round_starts_relative_to_current_clock() {
    let mut c = controller(engineered(1, 10));
    c.advance_to(ms(5_000));
    c.queue_command(RoundCommand::Start { guess: Some(1) });
    c.advance_to(ms(5_000));
    assert_eq!(c.next_deadline(), Some(ms(5_000 + FRAME_MS)));

    for frame in 1..=19 {
        c.advance_to(ms(5_000 + frame * FRAME_MS));
    }
    assert_eq!(c.round().collision_count, 1);
}

#[test]
fn test_direct_start_after_idle_gap_runs_full_round() {
    let mut c = controller(engineered(1, 10));
    c.advance_to(ms(0));
    c.start(1).unwrap();

    // First clock reading after the start is 30s later.
    let snap = c.advance_to(ms(30_000));
    assert_eq!(snap.phase, RoundPhase::Running);
    assert_eq!(snap.round.time_remaining, 20);
    assert_eq!(c.frames(), 0);
    assert_eq!(c.next_deadline(), Some(ms(30_000 + FRAME_MS)));

    for frame in 1..=19 {
        c.advance_to(ms(30_000 + frame * FRAME_MS));
    }
    assert_eq!(c.frames(), 19);
    assert_eq!(c.round().collision_count, 1);

    let (events, t) = run_to_end(&mut c, 30_000 + 19 * FRAME_MS);
    assert!(t >= 50_000);
    let (guess, count, matched, _) = ended_event(&events).unwrap();
    assert_eq!((guess, count, matched), (1, 1, true));
}

#[test]
fn test_direct_start_within_one_frame_keeps_anchor() {
    let mut c = controller(stationary(10));
    c.advance_to(ms(1_000));
    c.start(0).unwrap();
    c.advance_to(ms(1_000 + FRAME_MS));
    assert_eq!(c.frames(), 1);
    assert_eq!(c.next_deadline(), Some(ms(1_000 + 2 * FRAME_MS)));
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = GameConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut a = RoundController::new(config.clone());
    let mut b = RoundController::new(config);
    a.start(5).unwrap();
    b.start(5).unwrap();

    for frame in 1..=300 {
        let snap_a = a.advance_to(ms(frame * FRAME_MS));
        let snap_b = b.advance_to(ms(frame * FRAME_MS));
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let a = RoundController::new(GameConfig {
        seed: 111,
        ..Default::default()
    });
    let b = RoundController::new(GameConfig {
        seed: 222,
        ..Default::default()
    });
    assert_ne!(
        serde_json::to_string(&a.snapshot()).unwrap(),
        serde_json::to_string(&b.snapshot()).unwrap()
    );
}

#[test]
fn test_custom_radii_change_collision_threshold() {
    // A meteor parked 50px from the center hits only when the planned radius exceeds 50.
    let source = || ScriptedSource {
        meteors: vec![Meteor::new(Position::new(350.0, 300.0), Velocity::default())],
        next: 0,
    };

    let mut config = GameConfig::default();
    config.field.count = 1;
    config.planet.radius = 30.0;
    config.planet.meteor_radius = 10.0;
    let mut c = RoundController::with_source(config.clone(), source());
    c.start(0).unwrap();
    c.advance_to(ms(FRAME_MS));
    assert_eq!(c.round().collision_count, 0);

    config.planet.meteor_radius = 20.5;
    let mut c = RoundController::with_source(config, source());
    c.start(1).unwrap();
    c.advance_to(ms(FRAME_MS));
    assert_eq!(c.round().collision_count, 1);
}
