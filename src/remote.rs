//! Remote control payload
//!
//! Payload layout: `[event: 1][battery: 1][battery_mv: 2 LE]`.

use core::fmt;

use log::warn;

/// Exact length of a remote payload
pub const REMOTE_PAYLOAD_LEN: usize = 4;

const EVENT_EMPTY: u8 = 0;
const EVENT_ON: u8 = 1;
const EVENT_OFF: u8 = 2;
const EVENT_TOGGLE: u8 = 3;
const EVENT_UP1: u8 = 4;
const EVENT_DOWN1: u8 = 5;
const EVENT_UP2: u8 = 6;
const EVENT_DOWN2: u8 = 7;

/// Button event sent by a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    Empty,
    On,
    Off,
    Toggle,
    /// First axis up (brightness)
    Up1,
    /// First axis down (brightness)
    Down1,
    /// Second axis up (color where available)
    Up2,
    /// Second axis down (color where available)
    Down2,
    Unknown(u8),
}

impl RemoteEvent {
    pub const fn from_raw(value: u8) -> Self {
        match value {
            EVENT_EMPTY => Self::Empty,
            EVENT_ON => Self::On,
            EVENT_OFF => Self::Off,
            EVENT_TOGGLE => Self::Toggle,
            EVENT_UP1 => Self::Up1,
            EVENT_DOWN1 => Self::Down1,
            EVENT_UP2 => Self::Up2,
            EVENT_DOWN2 => Self::Down2,
            other => Self::Unknown(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Empty => EVENT_EMPTY,
            Self::On => EVENT_ON,
            Self::Off => EVENT_OFF,
            Self::Toggle => EVENT_TOGGLE,
            Self::Up1 => EVENT_UP1,
            Self::Down1 => EVENT_DOWN1,
            Self::Up2 => EVENT_UP2,
            Self::Down2 => EVENT_DOWN2,
            Self::Unknown(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload length differs from [`REMOTE_PAYLOAD_LEN`]
    Length(usize),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(f, "remote payload size mismatch: {len}"),
        }
    }
}

impl core::error::Error for PayloadError {}

/// Decoded remote payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePayload {
    pub event: RemoteEvent,
    /// Battery level as sent, `0..=255`
    pub battery_raw: u8,
    pub battery_mv: u16,
}

impl RemotePayload {
    pub fn decode(payload: &[u8]) -> Result<Self, PayloadError> {
        let &[event, battery_raw, mv_lo, mv_hi] = payload else {
            warn!("remote: payload size mismatch: {}", payload.len());
            return Err(PayloadError::Length(payload.len()));
        };
        Ok(Self {
            event: RemoteEvent::from_raw(event),
            battery_raw,
            battery_mv: u16::from_le_bytes([mv_lo, mv_hi]),
        })
    }

    pub const fn encode(&self) -> [u8; REMOTE_PAYLOAD_LEN] {
        let mv = self.battery_mv.to_le_bytes();
        [self.event.as_u8(), self.battery_raw, mv[0], mv[1]]
    }

    /// Battery level in percent
    pub const fn battery_percentage(&self) -> u8 {
        battery_percentage(self.battery_raw)
    }
}

/// Rescale a raw battery byte to percent, truncating
#[allow(clippy::cast_possible_truncation)]
pub const fn battery_percentage(raw: u8) -> u8 {
    (raw as u16 * 100 / 255) as u8
}
