#![forbid(unsafe_code)]

//! Trailing throttle with a single pending slot.
//!
//! The clock is injected: every call takes `now`, and the host drives the
//! trailing run by calling [`Throttle::poll`] from its timer. Nothing here
//! reads the system time.
//!
//! # Invariants
//! 1. At most one payload is pending. A newer payload replaces it.
//! 2. The trailing deadline is `last_run + timing`, fixed when the window's
//!    first payload is parked.
//! 3. With a zero window every payload runs immediately.

use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone)]
struct Pending<T> {
    payload: T,
    deadline: Instant,
}

/// Rate limiter for speculative work.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    timing: Duration,
    last_run: Option<Instant>,
    pending: Option<Pending<T>>,
}

impl<T> Throttle<T> {
    #[must_use]
    pub const fn new(timing: Duration) -> Self {
        Self {
            timing,
            last_run: None,
            pending: None,
        }
    }

    #[must_use]
    pub const fn timing(&self) -> Duration {
        self.timing
    }

    /// Record a run at `now` made outside the throttle. Drops any pending
    /// payload.
    pub fn run_now(&mut self, now: Instant) {
        self.pending = None;
        self.last_run = Some(now);
    }

    /// Offer a payload. Returns it if it must run now; otherwise it is parked
    /// until the window's deadline.
    pub fn submit(&mut self, payload: T, now: Instant) -> Option<T> {
        if self.timing.is_zero() {
            self.run_now(now);
            return Some(payload);
        }
        let deadline = match &self.pending {
            Some(pending) => pending.deadline,
            None => self.last_run.map_or(now, |last| last + self.timing),
        };
        if now >= deadline {
            self.run_now(now);
            return Some(payload);
        }
        self.pending = Some(Pending { payload, deadline });
        None
    }

    /// Take the pending payload if its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        let pending = self.pending.take()?;
        self.last_run = Some(now);
        Some(pending.payload)
    }

    /// Drop the pending payload, keeping the window.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Forget everything; the next payload opens a fresh window.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_run = None;
    }

    /// When the pending payload is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
