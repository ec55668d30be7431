//! Fixed-rate cadences for the frame loop and the countdown.
//!
//! A cadence is either armed (has a next due time) or cancelled. Nothing
//! fires unless the owner polls it, so cancelling is final until the next
//! `start`.

use std::time::Duration;

/// A periodic task trigger on an injected clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    next_due: Option<Duration>,
}

impl Cadence {
    /// Create a cancelled cadence.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the cadence; the first firing is one period after `now`.
    pub fn start(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Fire at most once if due at or before `now`, then re-arm one period
    /// after the due time (fixed rate, no drift).
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }

    /// Drop missed firings when more than `max_behind` periods late, so the
    /// next firing happens at `now` instead of replaying the backlog.
    pub fn resync_if_behind(&mut self, now: Duration, max_behind: u32) -> bool {
        match self.next_due {
            Some(due) if now > due && now - due > self.period * max_behind => {
                self.next_due = Some(now);
                true
            }
            _ => false,
        }
    }
}
