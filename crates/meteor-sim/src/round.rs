//! Round controller: the idle → running → ended → idle state machine.
//!
//! `RoundController` owns the meteor field, the explosion list and the two
//! cadences (animation frame and 1-second countdown). It is headless and
//! clock-agnostic: callers pass the current time in, which keeps every round
//! reproducible in tests.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, trace, warn};

use meteor_core::commands::RoundCommand;
use meteor_core::config::GameConfig;
use meteor_core::enums::RoundPhase;
use meteor_core::error::RoundError;
use meteor_core::events::RoundEvent;
use meteor_core::state::{PlanetView, RoundOutcome, RoundSnapshot, RoundState};

use crate::collision::CollisionRadii;
use crate::effects::EffectTracker;
use crate::field::MeteorField;
use crate::schedule::Cadence;
use crate::snapshot;
use crate::spawn::{MeteorSource, RandomVectorGenerator};

/// Most frames replayed by one `advance_to` call before the backlog is dropped.
pub const MAX_FRAME_CATCH_UP: u32 = 8;

/// Check a raw guess against `[0, max]`.
pub fn validate_guess(guess: i64, max: u32) -> Result<u32, RoundError> {
    if (0..=i64::from(max)).contains(&guess) {
        Ok(guess as u32)
    } else {
        Err(RoundError::InvalidGuess { guess, max })
    }
}

enum DueTask {
    Frame(Duration),
    Countdown(Duration),
}

/// The round state machine.
pub struct RoundController {
    config: GameConfig,
    radii: CollisionRadii,
    phase: RoundPhase,
    round: RoundState,
    pending_guess: u32,
    field: MeteorField,
    effects: EffectTracker,
    source: Box<dyn MeteorSource + Send>,
    frame: Cadence,
    countdown: Cadence,
    /// Latest clock reading seen.
    now: Duration,
    /// Clock reading at `start`, until the next `advance_to` confirms it.
    start_anchor: Option<Duration>,
    frames: u64,
    command_queue: VecDeque<RoundCommand>,
    events: Vec<RoundEvent>,
    outcome: Option<RoundOutcome>,
}

impl RoundController {
    /// Create an idle controller with a seeded random meteor source.
    pub fn new(config: GameConfig) -> Self {
        let source = RandomVectorGenerator::new(config.seed);
        Self::with_source(config, source)
    }

    /// Create an idle controller that spawns meteors from `source`.
    pub fn with_source(config: GameConfig, source: impl MeteorSource + Send + 'static) -> Self {
        let radii = CollisionRadii::from_config(&config.planet);
        let effects = EffectTracker::new(Duration::from_millis(config.effects.ttl_ms));
        let frame = Cadence::new(Duration::from_millis(config.timing.frame_ms));
        let countdown = Cadence::new(Duration::from_millis(config.timing.countdown_ms));
        let mut controller = Self {
            radii,
            phase: RoundPhase::Idle,
            round: RoundState {
                time_remaining: config.round.duration_secs,
                ..Default::default()
            },
            pending_guess: 0,
            field: MeteorField::new(),
            effects,
            source: Box::new(source),
            frame,
            countdown,
            now: Duration::ZERO,
            start_anchor: None,
            frames: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            outcome: None,
            config,
        };
        controller.respawn_field();
        controller
    }

    // --- Commands ---

    /// Queue a command for processing at the next `advance_to` boundary.
    pub fn queue_command(&mut self, command: RoundCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = RoundCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply a single command immediately.
    pub fn handle_command(&mut self, command: RoundCommand) -> Result<(), RoundError> {
        match command {
            RoundCommand::IncreaseGuess => self.increase_guess(),
            RoundCommand::DecreaseGuess => self.decrease_guess(),
            RoundCommand::SetGuess { guess } => self.set_guess(guess),
            RoundCommand::Start { guess } => {
                let guess = guess.unwrap_or(i64::from(self.pending_guess));
                self.start(guess)
            }
            RoundCommand::Reset => self.reset(),
        }
    }

    /// Raise the pending guess by one, saturating at the maximum.
    pub fn increase_guess(&mut self) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Idle, "change the guess")?;
        if self.pending_guess < self.config.round.max_guess {
            self.pending_guess += 1;
            self.events.push(RoundEvent::GuessChanged {
                guess: self.pending_guess,
            });
        }
        Ok(())
    }

    /// Lower the pending guess by one, saturating at zero.
    pub fn decrease_guess(&mut self) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Idle, "change the guess")?;
        if self.pending_guess > 0 {
            self.pending_guess -= 1;
            self.events.push(RoundEvent::GuessChanged {
                guess: self.pending_guess,
            });
        }
        Ok(())
    }

    pub fn set_guess(&mut self, guess: i64) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Idle, "change the guess")?;
        let guess = validate_guess(guess, self.config.round.max_guess)?;
        if guess != self.pending_guess {
            self.pending_guess = guess;
            self.events.push(RoundEvent::GuessChanged { guess });
        }
        Ok(())
    }

    /// Start a round with `guess`. Leaves all state untouched on error.
    pub fn start(&mut self, guess: i64) -> Result<(), RoundError> {
        self.require_phase(RoundPhase::Idle, "start")?;
        let guess = validate_guess(guess, self.config.round.max_guess)?;

        self.pending_guess = guess;
        self.round = RoundState {
            running: true,
            collision_count: 0,
            time_remaining: self.config.round.duration_secs,
            guess,
        };
        self.respawn_field();
        self.effects.clear();
        self.outcome = None;
        self.frames = 0;
        self.phase = RoundPhase::Running;
        self.frame.start(self.now);
        self.countdown.start(self.now);
        self.start_anchor = Some(self.now);

        self.events.push(RoundEvent::RoundStarted { guess });
        self.events.push(RoundEvent::CollisionCountChanged { count: 0 });
        self.events.push(RoundEvent::TimeRemainingChanged {
            seconds: self.round.time_remaining,
        });
        info!(
            "Round started: guess={guess}, meteors={}, duration={}s",
            self.field.len(),
            self.round.time_remaining
        );
        Ok(())
    }

    /// Finish the running round and score it.
    pub fn end(&mut self) -> Result<RoundOutcome, RoundError> {
        self.require_phase(RoundPhase::Running, "end")?;

        self.frame.cancel();
        self.countdown.cancel();
        self.start_anchor = None;
        self.phase = RoundPhase::Ended;
        self.round.running = false;

        let outcome = RoundOutcome::score(self.round.guess, self.round.collision_count);
        self.events.push(RoundEvent::RoundEnded {
            guess: outcome.guess,
            collision_count: outcome.collision_count,
            matched: outcome.matched,
            message: outcome.message.clone(),
        });
        info!(
            "Round ended after {} frames: {}",
            self.frames, outcome.message
        );
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Return to idle with a fresh field and zeroed counters.
    pub fn reset(&mut self) -> Result<(), RoundError> {
        if self.phase == RoundPhase::Running {
            return Err(self.reject("reset"));
        }

        self.frame.cancel();
        self.countdown.cancel();
        self.start_anchor = None;
        self.respawn_field();
        self.effects.clear();
        self.round = RoundState {
            time_remaining: self.config.round.duration_secs,
            ..Default::default()
        };
        self.pending_guess = 0;
        self.outcome = None;
        self.frames = 0;
        self.phase = RoundPhase::Idle;

        self.events.push(RoundEvent::RoundReset);
        self.events.push(RoundEvent::GuessChanged { guess: 0 });
        self.events.push(RoundEvent::CollisionCountChanged { count: 0 });
        self.events.push(RoundEvent::TimeRemainingChanged {
            seconds: self.round.time_remaining,
        });
        info!("Round reset");
        Ok(())
    }

    // --- Scheduled tasks ---

    /// One animation frame: move, detect, record explosions, prune.
    pub fn tick_frame(&mut self, now: Duration) {
        if self.phase != RoundPhase::Running {
            return;
        }
        self.frames += 1;

        self.field.advance(1);
        let hits = self
            .field
            .query_new_collisions(self.config.planet.center, &self.radii);

        for index in hits {
            let Some(position) = self.field.get(index).map(|m| m.position) else {
                continue;
            };
            self.round.collision_count += 1;
            debug_assert!(
                self.round.collision_count as usize <= self.field.len(),
                "collision count exceeds meteor count"
            );
            self.effects.record(position, now);
            debug!(
                "Meteor {index} hit the planet at ({:.1}, {:.1}); collisions={}",
                position.x, position.y, self.round.collision_count
            );
            self.events.push(RoundEvent::MeteorCollided { index, position });
            self.events.push(RoundEvent::CollisionCountChanged {
                count: self.round.collision_count,
            });
        }
        debug_assert_eq!(
            self.round.collision_count as usize,
            self.field.collided_count()
        );

        self.effects.prune(now);
        trace!(
            "Frame {}: {} meteors in flight, {} explosions",
            self.frames,
            self.field.len() - self.field.collided_count(),
            self.effects.len()
        );
    }

    /// One countdown step. Ends the round when the timer reaches zero.
    pub fn tick_countdown(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        debug_assert!(self.round.time_remaining > 0, "countdown below zero");
        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        self.events.push(RoundEvent::TimeRemainingChanged {
            seconds: self.round.time_remaining,
        });

        if self.round.time_remaining == 0 {
            let ended = self.end();
            debug_assert!(ended.is_ok(), "countdown expired outside a running round");
        }
    }

    /// Advance the clock to `now`, apply queued commands, run every due task
    /// in time order and return the resulting snapshot.
    ///
    /// Frame and countdown tasks interleave but never overlap. On a tie the
    /// frame runs first. Once a countdown step ends the round, both cadences
    /// are cancelled and no further frame runs.
    pub fn advance_to(&mut self, now: Duration) -> RoundSnapshot {
        self.now = self.now.max(now);
        let now = self.now;

        self.process_commands();
        self.anchor_started_round(now);
        if self.frame.resync_if_behind(now, MAX_FRAME_CATCH_UP) {
            warn!("Frame loop fell behind; dropping missed frames");
        }

        while let Some(task) = self.next_due_task(now) {
            match task {
                DueTask::Frame(due) => {
                    self.frame.poll(due);
                    self.tick_frame(due);
                }
                DueTask::Countdown(due) => {
                    self.countdown.poll(due);
                    self.tick_countdown();
                }
            }
        }

        // Frames stop at round end; explosions still have to expire.
        self.effects.prune(now);
        self.take_snapshot()
    }

    /// Re-arm both cadences at `now` when `start` was called against a clock
    /// reading more than `MAX_FRAME_CATCH_UP` frames old.
    fn anchor_started_round(&mut self, now: Duration) {
        let Some(started) = self.start_anchor.take() else {
            return;
        };
        if now - started > self.frame.period() * MAX_FRAME_CATCH_UP {
            self.frame.start(now);
            self.countdown.start(now);
            debug!(
                "Round start re-anchored from {}ms to {}ms",
                started.as_millis(),
                now.as_millis()
            );
        }
    }

    /// Earliest task due at or before `now`; frame wins ties.
    fn next_due_task(&self, now: Duration) -> Option<DueTask> {
        let frame = self.frame.next_due().filter(|due| *due <= now);
        let countdown = self.countdown.next_due().filter(|due| *due <= now);
        match (frame, countdown) {
            (Some(f), Some(c)) if c < f => Some(DueTask::Countdown(c)),
            (Some(f), _) => Some(DueTask::Frame(f)),
            (None, Some(c)) => Some(DueTask::Countdown(c)),
            (None, None) => None,
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            // Phase rejections are already logged by `reject`.
            if let Err(err @ RoundError::InvalidGuess { .. }) = self.handle_command(command) {
                warn!("{err}");
            }
        }
    }

    // --- Snapshots ---

    /// Snapshot carrying the events raised since the previous one.
    pub fn take_snapshot(&mut self) -> RoundSnapshot {
        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    /// Snapshot without consuming pending events.
    pub fn snapshot(&self) -> RoundSnapshot {
        self.build_snapshot(Vec::new())
    }

    fn build_snapshot(&self, events: Vec<RoundEvent>) -> RoundSnapshot {
        snapshot::build_snapshot(
            self.phase,
            self.round,
            self.pending_guess,
            PlanetView {
                center: self.config.planet.center,
                radius: self.radii.planet,
            },
            &self.field,
            &self.effects,
            self.now,
            events,
            self.outcome.clone(),
        )
    }

    // --- Accessors ---

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn pending_guess(&self) -> u32 {
        self.pending_guess
    }

    pub fn field(&self) -> &MeteorField {
        &self.field
    }

    pub fn effects(&self) -> &EffectTracker {
        &self.effects
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn radii(&self) -> CollisionRadii {
        self.radii
    }

    /// Latest clock reading passed to `advance_to`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Frames run in the current round.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_frame_active(&self) -> bool {
        self.frame.is_active()
    }

    pub fn is_countdown_active(&self) -> bool {
        self.countdown.is_active()
    }

    /// Earliest pending deadline across both cadences, if any is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.frame.next_due(), self.countdown.next_due()) {
            (Some(f), Some(c)) => Some(f.min(c)),
            (f, c) => f.or(c),
        }
    }

    // --- Helpers ---

    fn respawn_field(&mut self) {
        self.field.reset(&self.config.field, self.source.as_mut());
    }

    fn require_phase(&self, phase: RoundPhase, action: &'static str) -> Result<(), RoundError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    fn reject(&self, action: &'static str) -> RoundError {
        warn!("Rejected '{action}' while round is {}", self.phase);
        RoundError::InvalidPhase {
            action,
            phase: self.phase,
        }
    }
}
