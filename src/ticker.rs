//! Output pacing.
//!
//! Drives the transition scheduler on a fixed period and forwards duty values
//! to the PWM output. No async or platform timers: the caller sleeps for the
//! returned duration between ticks.

use embassy_time::{Duration, Instant};

use crate::engine::{LightEngine, SharedEngine};
use crate::state::LightState;
use crate::storage::Store;

/// PWM output for the physical channels
///
/// Implement this for the platform's PWM peripheral. Duty values are in
/// `0..=max_value` of the light configuration, one per channel in topology
/// order.
pub trait OutputDriver {
    fn write(&mut self, duties: &[u16]);
}

/// Result of one ticker step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// When the next tick is due
    pub next_deadline: Instant,
    /// How long to wait until then, zero when behind schedule
    pub sleep_duration: Duration,
}

/// Periodic driver between the engine and the output
///
/// ```ignore
/// let mut ticker = LightTicker::new(pwm, config.tick_period);
///
/// loop {
///     let result = ticker.tick_shared(&engine, Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct LightTicker<O: OutputDriver, const N: usize> {
    output: O,
    period: Duration,
    next_tick: Instant,
    written: Option<[u16; N]>,
}

impl<O: OutputDriver, const N: usize> LightTicker<O, N> {
    pub const fn new(output: O, period: Duration) -> Self {
        Self {
            output,
            period,
            next_tick: Instant::from_millis(0),
            written: None,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub const fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Advance the engine to `now` and write duties that changed.
    pub fn tick<S: Store<LightState>>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        now: Instant,
    ) -> TickResult {
        engine.tick(now);
        self.write(engine.duties());
        self.schedule(now)
    }

    /// Same as [`Self::tick`], holding the engine lock only while advancing
    pub fn tick_shared<S: Store<LightState>>(
        &mut self,
        engine: &SharedEngine<'_, S, N>,
        now: Instant,
    ) -> TickResult {
        let duties = engine.lock(|engine| {
            engine.tick(now);
            *engine.duties()
        });
        self.write(&duties);
        self.schedule(now)
    }

    fn write(&mut self, duties: &[u16; N]) {
        if self.written.as_ref() == Some(duties) {
            return;
        }
        self.output.write(duties);
        self.written = Some(*duties);
    }

    fn schedule(&mut self, now: Instant) -> TickResult {
        // More than two periods behind: skip the backlog
        let max_drift = self.period + self.period;
        if now > self.next_tick + max_drift {
            self.next_tick = now;
        }
        self.next_tick += self.period;

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration: self.next_tick.saturating_duration_since(now),
        }
    }
}
