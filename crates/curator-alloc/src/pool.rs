//! The decaying voting-power pool and its consumption law.

use curator_core::constants::POOL_CAPACITY;

/// A 0–100 voting-power gauge that shrinks proportionally to its own
/// remaining value on every vote.
///
/// The law is `usage = decay_rate * weight/100 * remaining`, computed from
/// `remaining`, never from `capacity` — that is what produces the decay.
/// Cloning the pool gives the estimator its side-effect-free simulation
/// copies.
#[derive(Debug, Clone, PartialEq)]
pub struct VotingPool {
    capacity: f64,
    remaining: f64,
    decay_rate: f64,
}

impl VotingPool {
    /// A full pool.
    pub fn new(decay_rate: f64) -> Self {
        Self {
            capacity: POOL_CAPACITY,
            remaining: POOL_CAPACITY,
            decay_rate,
        }
    }

    /// A pool with some power already spent, clamped into `[0, capacity]`.
    pub fn with_remaining(decay_rate: f64, remaining: f64) -> Self {
        Self {
            capacity: POOL_CAPACITY,
            remaining: remaining.clamp(0.0, POOL_CAPACITY),
            decay_rate,
        }
    }

    /// Consume one vote of `weight` percent; returns the absolute usage.
    pub fn consume(&mut self, weight: f64) -> f64 {
        let usage = self.peek_usage(weight);
        self.remaining = (self.remaining - usage).clamp(0.0, self.capacity);
        usage
    }

    /// Usage a vote of `weight` percent would cost right now, without
    /// mutating the pool.
    pub fn peek_usage(&self, weight: f64) -> f64 {
        self.decay_rate * (weight / 100.0) * self.remaining
    }

    /// Drain a pre-computed total usage (e.g. an entire sub-budget).
    pub fn drain(&mut self, usage: f64) {
        self.remaining = (self.remaining - usage).clamp(0.0, self.capacity);
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Power consumed so far this run.
    pub fn used(&self) -> f64 {
        self.capacity - self.remaining
    }

    pub fn is_full(&self) -> bool {
        self.remaining >= self.capacity
    }
}
