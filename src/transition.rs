//! Transition scheduler
//!
//! Moves every channel's current duty toward its target within a shared time
//! budget. The step of each channel is recomputed on every tick from the
//! remaining delta and the remaining budget, so channels with different
//! deltas finish together.

use embassy_time::{Duration, Instant};

/// Per-channel duty values with independent current and target vectors.
#[derive(Debug, Clone)]
pub struct TransitionScheduler<const N: usize> {
    current: [u16; N],
    target: [u16; N],
    /// Budget left for the running transition
    remaining: Duration,
    /// Time of the last tick, `None` before the first one
    last_tick: Option<Instant>,
}

impl<const N: usize> TransitionScheduler<N> {
    /// Create a scheduler with every channel at zero
    pub const fn new() -> Self {
        Self {
            current: [0; N],
            target: [0; N],
            remaining: Duration::from_millis(0),
            last_tick: None,
        }
    }

    /// Current duty values, written to the output on every tick
    pub const fn current(&self) -> &[u16; N] {
        &self.current
    }

    /// Target duty values
    pub const fn target(&self) -> &[u16; N] {
        &self.target
    }

    /// Budget left for the running transition
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Check if any channel still differs from its target
    pub fn is_transitioning(&self) -> bool {
        self.current != self.target
    }

    /// Start a transition from the current values toward `target`.
    ///
    /// A zero duration makes the next tick jump straight to the target.
    /// An in-flight transition is replaced, starting from where it is now.
    pub fn retarget(&mut self, target: [u16; N], duration: Duration) {
        self.target = target;
        self.remaining = duration;
    }

    /// Jump to the target immediately, without waiting for a tick
    pub fn finish(&mut self) {
        self.current = self.target;
        self.remaining = Duration::from_millis(0);
    }

    /// Advance using wall-clock time.
    ///
    /// The first call only records the time. Calls with no elapsed
    /// milliseconds are ignored.
    pub fn tick(&mut self, now: Instant) {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed.as_millis() == 0 {
            return;
        }
        self.last_tick = Some(now);
        self.advance(elapsed);
    }

    /// Advance every channel by `elapsed` worth of the remaining budget.
    ///
    /// Less than a millisecond of elapsed time moves nothing.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance(&mut self, elapsed: Duration) {
        if elapsed.as_millis() == 0 {
            return;
        }

        self.remaining = if elapsed >= self.remaining {
            Duration::from_millis(0)
        } else {
            self.remaining - elapsed
        };

        let elapsed_ms = elapsed.as_millis() as i64;
        let remaining_ms = self.remaining.as_millis() as i64;

        for (current, target) in self.current.iter_mut().zip(self.target) {
            let delta = i64::from(target) - i64::from(*current);
            if delta == 0 {
                continue;
            }

            let mut step = if remaining_ms > 0 {
                let step = delta * elapsed_ms / remaining_ms;
                if step == 0 { delta.signum() } else { step }
            } else {
                delta
            };
            if step.abs() > delta.abs() {
                step = delta;
            }

            *current = (i64::from(*current) + step) as u16;
        }
    }
}

impl<const N: usize> Default for TransitionScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}
