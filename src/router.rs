//! Event router
//!
//! Single entry point for everything that changes the light: decoded radio
//! frames, network commands and local button actions. Remote and network paths
//! reach the engine through the same setters, so clamping and validation never
//! diverge between them.

use core::fmt;

use log::{debug, warn};

use crate::channel::{Channel, Receiver, Sender};
use crate::engine::{LightEngine, LightError};
use crate::frame::{self, DecodeError, MessageKind};
use crate::network::{CommandError, LightCommand, saturate};
use crate::radio::PacketReceiver;
use crate::registry::RemoteRegistry;
use crate::remote::{PayloadError, RemoteEvent, RemotePayload};
use crate::state::LightState;
use crate::storage::Store;
use crate::topology::Topology;

/// Queue depth of the remote notice channel
pub const REMOTE_NOTICE_CHANNEL_SIZE: usize = 4;

/// Notice for the network collaborator about remotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteNotice {
    /// A remote was seen for the first time
    Discovered([u8; 4]),
}

/// Type alias for the remote notice channel
pub type RemoteNoticeChannel = Channel<RemoteNotice, REMOTE_NOTICE_CHANNEL_SIZE>;

/// Type alias for remote notice sender
pub type RemoteNoticeSender<'a> = Sender<'a, RemoteNotice, REMOTE_NOTICE_CHANNEL_SIZE>;

/// Type alias for remote notice receiver
pub type RemoteNoticeReceiver<'a> = Receiver<'a, RemoteNotice, REMOTE_NOTICE_CHANNEL_SIZE>;

/// Why a packet was not acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Decode(DecodeError),
    ChecksumMismatch,
    Payload(PayloadError),
    UnsupportedMessage(MessageKind),
}

/// Result of routing one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Remote event applied
    Remote {
        uuid: [u8; 4],
        event: RemoteEvent,
        is_new: bool,
    },
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    Command(CommandError),
    Light(LightError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => e.fmt(f),
            Self::Light(e) => e.fmt(f),
        }
    }
}

impl core::error::Error for RouteError {}

impl From<CommandError> for RouteError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

impl From<LightError> for RouteError {
    fn from(e: LightError) -> Self {
        Self::Light(e)
    }
}

/// What a local button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonBehavior {
    /// Click or first hold step toggles power
    Toggle,
    /// Click toggles power, holding dims up or down
    Dimmer,
}

/// Debounced button action reported by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Button went down
    Press,
    /// Button released before any hold step
    Click,
    /// Hold step, counting from 1 while the button stays down
    Hold(u32),
}

/// Routes remote, network and button input into the engine
#[derive(Debug)]
pub struct EventRouter<'a> {
    registry: RemoteRegistry,
    notices: Option<RemoteNoticeSender<'a>>,
    dim_up: bool,
}

impl<'a> EventRouter<'a> {
    pub const fn new() -> Self {
        Self {
            registry: RemoteRegistry::new(),
            notices: None,
            dim_up: true,
        }
    }

    /// Report first sightings of remotes to `sender`
    #[must_use]
    pub fn with_notices(mut self, sender: RemoteNoticeSender<'a>) -> Self {
        self.notices = Some(sender);
        self
    }

    pub const fn registry(&self) -> &RemoteRegistry {
        &self.registry
    }

    /// Decode and handle every queued packet, in arrival order
    pub fn process_packets<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        packets: &PacketReceiver<'_>,
    ) {
        for packet in packets.drain() {
            if let Err(e) = self.handle_packet(engine, &packet) {
                warn!("router: remote event not applied: {}", e);
            }
        }
    }

    /// Decode a raw radio packet and apply it.
    ///
    /// Malformed packets are dropped without touching the engine or the
    /// registry.
    pub fn handle_packet<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        bytes: &[u8],
    ) -> Result<PacketOutcome, LightError> {
        let frame = match frame::decode(bytes) {
            Ok(frame) => frame,
            Err(e) => return Ok(PacketOutcome::Dropped(DropReason::Decode(e))),
        };
        if !frame.is_valid() {
            return Ok(PacketOutcome::Dropped(DropReason::ChecksumMismatch));
        }
        if frame.kind != MessageKind::Remote {
            warn!("router: unknown message type: {}", frame.kind.as_u8());
            return Ok(PacketOutcome::Dropped(DropReason::UnsupportedMessage(
                frame.kind,
            )));
        }

        let payload = match RemotePayload::decode(&frame.payload) {
            Ok(payload) => payload,
            Err(e) => return Ok(PacketOutcome::Dropped(DropReason::Payload(e))),
        };
        debug!(
            "router: remote event {:?} battery={}% {}mV seq={}",
            payload.event,
            payload.battery_percentage(),
            payload.battery_mv,
            frame.sequence
        );

        let observation = self
            .registry
            .observe(frame.uuid, payload.battery_raw, payload.battery_mv);
        if observation.is_new {
            self.announce(frame.uuid);
        }

        self.handle_remote_event(engine, payload.event)?;
        Ok(PacketOutcome::Remote {
            uuid: frame.uuid,
            event: payload.event,
            is_new: observation.is_new,
        })
    }

    /// Apply a remote event.
    ///
    /// The second axis adjusts the color mix on CCT lights and falls back to
    /// brightness everywhere else.
    pub fn handle_remote_event<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        event: RemoteEvent,
    ) -> Result<(), LightError> {
        let is_cct = engine.topology() == Topology::Cct;
        match event {
            RemoteEvent::On => engine.set_power(true, None),
            RemoteEvent::Off => engine.set_power(false, None),
            RemoteEvent::Toggle => engine.toggle_power(None).map(|_| ()),
            RemoteEvent::Up1 => engine.increase_brightness(),
            RemoteEvent::Down1 => engine.decrease_brightness(),
            RemoteEvent::Up2 if is_cct => engine.increase_color(),
            RemoteEvent::Up2 => engine.increase_brightness(),
            RemoteEvent::Down2 if is_cct => engine.decrease_color(),
            RemoteEvent::Down2 => engine.decrease_brightness(),
            RemoteEvent::Empty | RemoteEvent::Unknown(_) => Ok(()),
        }
    }

    /// Parse and apply a JSON network command
    pub fn handle_command_json<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        payload: &[u8],
    ) -> Result<(), RouteError> {
        let command =
            LightCommand::from_json(payload).inspect_err(|e| warn!("router: {}", e))?;
        self.handle_command(engine, &command)?;
        Ok(())
    }

    /// Apply a network command: state, then brightness, then color.
    pub fn handle_command<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        command: &LightCommand<'_>,
    ) -> Result<(), LightError> {
        match command.power() {
            Some(Ok(power)) => engine.set_power(power, None)?,
            Some(Err(state)) => warn!("router: invalid state value: {}", state),
            None => {}
        }

        if let Some(brightness) = command.brightness {
            engine.set_brightness(saturate(brightness), None)?;
        }

        let topology = engine.topology();
        if let Some(mireds) = command.color_temp {
            if topology == Topology::Cct {
                engine.set_color_temperature(saturate(mireds), None)?;
            } else {
                warn!("router: color_temp ignored for {} light", topology);
            }
        }

        if command.has_channels() {
            Self::apply_channels(engine, command)?;
        }
        Ok(())
    }

    fn apply_channels<S: Store<LightState>, const N: usize>(
        engine: &mut LightEngine<'_, S, N>,
        command: &LightCommand<'_>,
    ) -> Result<(), LightError> {
        let pick = |value: Option<u32>, current: u16| value.map_or(current, saturate);
        let red = pick(command.red, engine.red());
        let green = pick(command.green, engine.green());
        let blue = pick(command.blue, engine.blue());
        let ww = pick(command.ww, engine.warm_white());
        let cw = pick(command.cw, engine.cold_white());

        match engine.topology() {
            Topology::Rgb => engine.set_rgb(red, green, blue, None),
            Topology::Rgbw => engine.set_rgbw(red, green, blue, ww, None),
            Topology::Rgbww => engine.set_rgbww(red, green, blue, ww, cw, None),
            topology @ (Topology::Single | Topology::Cct) => {
                warn!("router: color channels ignored for {} light", topology);
                Ok(())
            }
        }
    }

    /// Apply a debounced button action
    pub fn handle_button<S: Store<LightState>, const N: usize>(
        &mut self,
        engine: &mut LightEngine<'_, S, N>,
        behavior: ButtonBehavior,
        action: ButtonAction,
    ) -> Result<(), LightError> {
        match (behavior, action) {
            (_, ButtonAction::Press) => {
                self.dim_up = engine.brightness() != engine.config().max_value;
                Ok(())
            }
            (_, ButtonAction::Click) | (ButtonBehavior::Toggle, ButtonAction::Hold(1)) => {
                engine.toggle_power(None).map(|_| ())
            }
            (ButtonBehavior::Toggle, ButtonAction::Hold(_)) => Ok(()),
            (ButtonBehavior::Dimmer, ButtonAction::Hold(_)) => {
                if self.dim_up {
                    engine.increase_brightness()
                } else {
                    engine.decrease_brightness()
                }
            }
        }
    }

    fn announce(&self, uuid: [u8; 4]) {
        let Some(notices) = &self.notices else {
            return;
        };
        if notices.try_send(RemoteNotice::Discovered(uuid)).is_err() {
            warn!("router: remote notice queue full");
        }
    }
}

impl Default for EventRouter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
