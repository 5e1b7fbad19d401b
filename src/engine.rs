//! Lighting engine - owner of the light state.
//!
//! Every setter follows the same path: clamp the input, resolve new channel
//! targets, hand them to the transition scheduler, persist the state and
//! notify subscribers. A failed resolve leaves state and targets untouched.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use log::{error, info, warn};

use crate::channel::{Channel, Receiver, Sender};
use crate::color::{color_mix_to_mireds, mireds_to_color_mix};
use crate::config::LightConfig;
use crate::network::StateSnapshot;
use crate::resolver::{ChannelTargets, ResolveError, resolve};
use crate::state::{Field, LightState};
use crate::storage::Store;
use crate::topology::Topology;
use crate::transition::TransitionScheduler;

/// Maximum number of change subscribers
pub const MAX_SUBSCRIBERS: usize = 4;

/// Queue depth of each subscriber channel
pub const CHANGE_CHANNEL_SIZE: usize = 4;

/// Snapshot published after every successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightChange {
    pub state: LightState,
}

/// Type alias for the change channel owned by a subscriber
pub type ChangeChannel = Channel<LightChange, CHANGE_CHANNEL_SIZE>;

/// Type alias for change sender
pub type ChangeSender<'a> = Sender<'a, LightChange, CHANGE_CHANNEL_SIZE>;

/// Type alias for change receiver
pub type ChangeReceiver<'a> = Receiver<'a, LightChange, CHANGE_CHANNEL_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightError {
    /// Channel targets could not be resolved, nothing was applied
    Resolve(ResolveError),
    /// All subscriber slots are taken
    TooManySubscribers,
}

impl fmt::Display for LightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "cannot resolve channel targets: {e}"),
            Self::TooManySubscribers => f.write_str("too many change subscribers"),
        }
    }
}

impl core::error::Error for LightError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Resolve(e) => Some(e),
            Self::TooManySubscribers => None,
        }
    }
}

impl From<ResolveError> for LightError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

/// Lighting engine driving `N` physical channels
pub struct LightEngine<'a, S: Store<LightState>, const N: usize> {
    config: LightConfig,
    store: S,
    state: LightState,
    scheduler: TransitionScheduler<N>,
    subscribers: heapless::Vec<ChangeSender<'a>, MAX_SUBSCRIBERS>,
}

impl<'a, S: Store<LightState>, const N: usize> LightEngine<'a, S, N> {
    /// Create the engine, loading the last persisted state.
    ///
    /// Missing or unreadable state falls back to defaults. Initial targets
    /// fade in over the default transition.
    pub fn new(config: LightConfig, mut store: S) -> Self {
        if let Err(e) = config.validate() {
            error!("light: invalid configuration: {}", e);
        }
        let mut state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => LightState::new(),
            Err(e) => {
                error!("light: cannot load state, using defaults: {}", e);
                LightState::new()
            }
        };
        for field in state.clamp_to(config.max_value) {
            warn!(
                "light: stored {} above {}, clamped",
                field.as_str(),
                config.max_value
            );
        }
        info!(
            "light: loaded state power={} brightness={} color={} rgb=({}, {}, {}) ww={} cw={}",
            state.power,
            state.brightness,
            state.color_mix,
            state.red,
            state.green,
            state.blue,
            state.warm_white,
            state.cold_white
        );

        let mut scheduler = TransitionScheduler::new();
        match resolve::<N>(&state, config.topology, config.max_value) {
            Ok(targets) => scheduler.retarget(targets, config.default_transition),
            Err(e) => error!("light: {}", e),
        }

        Self {
            config,
            store,
            state,
            scheduler,
            subscribers: heapless::Vec::new(),
        }
    }

    /// Register a change subscriber
    pub fn subscribe(&mut self, sender: ChangeSender<'a>) -> Result<(), LightError> {
        self.subscribers
            .push(sender)
            .map_err(|_| LightError::TooManySubscribers)
    }

    pub const fn config(&self) -> &LightConfig {
        &self.config
    }

    pub const fn topology(&self) -> Topology {
        self.config.topology
    }

    pub const fn state(&self) -> &LightState {
        &self.state
    }

    pub const fn power(&self) -> bool {
        self.state.power
    }

    pub const fn brightness(&self) -> u16 {
        self.state.brightness
    }

    /// Color-mix scalar of CCT lights
    pub const fn color(&self) -> u16 {
        self.state.color_mix
    }

    /// Color temperature in mireds derived from the color mix
    pub fn color_temperature(&self) -> u16 {
        color_mix_to_mireds(
            self.state.color_mix,
            self.config.color_temperature,
            self.config.max_value,
        )
    }

    pub const fn red(&self) -> u16 {
        self.state.red
    }

    pub const fn green(&self) -> u16 {
        self.state.green
    }

    pub const fn blue(&self) -> u16 {
        self.state.blue
    }

    pub const fn warm_white(&self) -> u16 {
        self.state.warm_white
    }

    pub const fn cold_white(&self) -> u16 {
        self.state.cold_white
    }

    /// Snapshot of the current state for publishing
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(&self.state, &self.config)
    }

    /// Target duty values of the running transition
    pub const fn targets(&self) -> &ChannelTargets<N> {
        self.scheduler.target()
    }

    /// Duty values to write to the output right now
    pub const fn duties(&self) -> &[u16; N] {
        self.scheduler.current()
    }

    pub fn is_transitioning(&self) -> bool {
        self.scheduler.is_transitioning()
    }

    /// Advance the running transition to `now`
    pub fn tick(&mut self, now: Instant) {
        self.scheduler.tick(now);
    }

    /// Advance the running transition by `elapsed`
    pub fn advance(&mut self, elapsed: Duration) {
        self.scheduler.advance(elapsed);
    }

    pub fn set_power(
        &mut self,
        power: bool,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.apply(transition, |state| state.power = power)
    }

    /// Flip power, returning the new power state
    pub fn toggle_power(&mut self, transition: Option<Duration>) -> Result<bool, LightError> {
        let power = !self.state.power;
        self.set_power(power, transition)?;
        Ok(power)
    }

    pub fn set_brightness(
        &mut self,
        brightness: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_field(Field::Brightness, brightness, transition)
    }

    /// Set the raw color-mix scalar
    pub fn set_color(
        &mut self,
        color_mix: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_field(Field::ColorMix, color_mix, transition)
    }

    /// Set the color temperature in mireds
    pub fn set_color_temperature(
        &mut self,
        mireds: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        let range = self.config.color_temperature;
        if !range.contains(mireds) {
            warn!(
                "light: color temperature {} outside {}..={} mireds, clamped",
                mireds, range.min, range.max
            );
        }
        let color_mix = mireds_to_color_mix(mireds, range, self.config.max_value);
        self.set_color(color_mix, transition)
    }

    pub fn set_red(&mut self, red: u16, transition: Option<Duration>) -> Result<(), LightError> {
        self.set_field(Field::Red, red, transition)
    }

    pub fn set_green(
        &mut self,
        green: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_field(Field::Green, green, transition)
    }

    pub fn set_blue(&mut self, blue: u16, transition: Option<Duration>) -> Result<(), LightError> {
        self.set_field(Field::Blue, blue, transition)
    }

    pub fn set_warm_white(
        &mut self,
        ww: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_field(Field::WarmWhite, ww, transition)
    }

    pub fn set_cold_white(
        &mut self,
        cw: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_field(Field::ColdWhite, cw, transition)
    }

    pub fn set_rgb(
        &mut self,
        red: u16,
        green: u16,
        blue: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_fields(
            &[(Field::Red, red), (Field::Green, green), (Field::Blue, blue)],
            transition,
        )
    }

    pub fn set_rgbw(
        &mut self,
        red: u16,
        green: u16,
        blue: u16,
        ww: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_fields(
            &[
                (Field::Red, red),
                (Field::Green, green),
                (Field::Blue, blue),
                (Field::WarmWhite, ww),
            ],
            transition,
        )
    }

    pub fn set_rgbww(
        &mut self,
        red: u16,
        green: u16,
        blue: u16,
        ww: u16,
        cw: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_fields(
            &[
                (Field::Red, red),
                (Field::Green, green),
                (Field::Blue, blue),
                (Field::WarmWhite, ww),
                (Field::ColdWhite, cw),
            ],
            transition,
        )
    }

    pub fn increase_brightness(&mut self) -> Result<(), LightError> {
        self.increase(Field::Brightness)
    }

    pub fn decrease_brightness(&mut self) -> Result<(), LightError> {
        self.decrease(Field::Brightness)
    }

    /// Step the color mix toward warm
    pub fn increase_color(&mut self) -> Result<(), LightError> {
        self.increase(Field::ColorMix)
    }

    /// Step the color mix toward cold
    pub fn decrease_color(&mut self) -> Result<(), LightError> {
        self.decrease(Field::ColorMix)
    }

    /// Step a field up by its configured step size.
    ///
    /// Brightness is left alone while the light is off.
    pub fn increase(&mut self, field: Field) -> Result<(), LightError> {
        self.step(field, true)
    }

    /// Step a field down by its configured step size.
    ///
    /// Brightness stops at the configured minimum and is left alone while
    /// the light is off.
    pub fn decrease(&mut self, field: Field) -> Result<(), LightError> {
        self.step(field, false)
    }

    fn step(&mut self, field: Field, up: bool) -> Result<(), LightError> {
        let (step, floor) = match field {
            Field::Brightness => {
                if !self.state.power {
                    return Ok(());
                }
                (self.config.brightness_step, self.config.min_brightness)
            }
            _ => (self.config.color_step, 0),
        };
        let value = self.state.get(field);
        let next = if up {
            value.saturating_add(step)
        } else {
            value.saturating_sub(step)
        };
        let next = next
            .min(self.config.max_value)
            .max(floor.min(self.config.max_value));
        self.apply(None, |state| state.set(field, next))
    }

    fn set_field(
        &mut self,
        field: Field,
        value: u16,
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        self.set_fields(&[(field, value)], transition)
    }

    fn set_fields(
        &mut self,
        values: &[(Field, u16)],
        transition: Option<Duration>,
    ) -> Result<(), LightError> {
        let max = self.config.max_value;
        self.apply(transition, |state| {
            for &(field, value) in values {
                state.set(field, clamp_value(field, value, max));
            }
        })
    }

    /// Apply a mutation, keeping the previous state if targets cannot be resolved
    fn apply(
        &mut self,
        transition: Option<Duration>,
        mutate: impl FnOnce(&mut LightState),
    ) -> Result<(), LightError> {
        let mut next = self.state;
        mutate(&mut next);

        let targets = resolve::<N>(&next, self.config.topology, self.config.max_value)
            .inspect_err(|e| error!("light: {}, change dropped", e))?;

        self.state = next;
        self.scheduler.retarget(
            targets,
            transition.unwrap_or(self.config.default_transition),
        );
        self.persist();
        self.notify();
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state) {
            error!("light: error persisting light state: {}", e);
        }
    }

    fn notify(&self) {
        let change = LightChange { state: self.state };
        for subscriber in &self.subscribers {
            if subscriber.try_send(change).is_err() {
                warn!("light: change subscriber queue full, notification dropped");
            }
        }
    }
}

fn clamp_value(field: Field, value: u16, max: u16) -> u16 {
    if value > max {
        warn!(
            "light: {} value {} is greater than maximum value {}, setting to maximum value",
            field.as_str(),
            value,
            max
        );
        return max;
    }
    value
}

/// Engine shared between execution contexts.
///
/// Radio decoding and network commands run in different contexts but both
/// mutate the engine; all access goes through [`SharedEngine::lock`].
pub struct SharedEngine<'a, S: Store<LightState>, const N: usize> {
    inner: Mutex<RefCell<LightEngine<'a, S, N>>>,
}

impl<'a, S: Store<LightState>, const N: usize> SharedEngine<'a, S, N> {
    pub const fn new(engine: LightEngine<'a, S, N>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn lock<R>(&self, f: impl FnOnce(&mut LightEngine<'a, S, N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    pub fn into_inner(self) -> LightEngine<'a, S, N> {
        self.inner.into_inner().into_inner()
    }
}
