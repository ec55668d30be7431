//! Transient explosion markers with a fixed time-to-live.

use std::time::Duration;

use meteor_core::types::Position;

/// An explosion marker. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub position: Position,
    /// Clock reading when the explosion was recorded.
    pub created_at: Duration,
}

impl Explosion {
    /// Time since creation. Zero if `now` precedes `created_at`.
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.created_at)
    }
}

/// Records explosions and drops them once they reach the TTL.
#[derive(Debug, Clone)]
pub struct EffectTracker {
    effects: Vec<Explosion>,
    ttl: Duration,
}

impl EffectTracker {
    pub fn new(ttl: Duration) -> Self {
        Self {
            effects: Vec::new(),
            ttl,
        }
    }

    pub fn record(&mut self, position: Position, now: Duration) {
        self.effects.push(Explosion {
            position,
            created_at: now,
        });
    }

    /// Remove every effect with `now - created_at >= ttl`. Returns how many were removed.
    pub fn prune(&mut self, now: Duration) -> usize {
        let before = self.effects.len();
        let ttl = self.ttl;
        self.effects.retain(|e| e.age(now) < ttl);
        before - self.effects.len()
    }

    pub fn active_effects(&self) -> &[Explosion] {
        &self.effects
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
