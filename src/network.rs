//! Network payloads
//!
//! JSON command messages accepted from the network collaborator and the
//! snapshots it publishes.

use core::fmt;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::color::color_mix_to_mireds;
use crate::config::LightConfig;
use crate::registry::RemoteInfo;
use crate::state::LightState;
use crate::topology::Topology;

const STATE_ON: &str = "ON";
const STATE_OFF: &str = "OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Payload is not a valid command document
    Json,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("malformed command payload"),
        }
    }
}

impl core::error::Error for CommandError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Output buffer cannot hold the serialized snapshot
    BufferTooSmall,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("snapshot buffer too small"),
        }
    }
}

impl core::error::Error for SnapshotError {}

/// Light command received from the network
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LightCommand<'a> {
    /// Requested state ("ON" or "OFF", any case)
    #[serde(default, borrow)]
    pub state: Option<&'a str>,
    #[serde(default)]
    pub brightness: Option<u32>,
    /// Requested color temperature in mireds
    #[serde(default)]
    pub color_temp: Option<u32>,
    #[serde(default)]
    pub red: Option<u32>,
    #[serde(default)]
    pub green: Option<u32>,
    #[serde(default)]
    pub blue: Option<u32>,
    #[serde(default)]
    pub ww: Option<u32>,
    #[serde(default)]
    pub cw: Option<u32>,
}

impl<'a> LightCommand<'a> {
    /// Parse a JSON command
    pub fn from_json(payload: &'a [u8]) -> Result<Self, CommandError> {
        serde_json_core::from_slice(payload)
            .map(|(command, _)| command)
            .map_err(|_| CommandError::Json)
    }

    /// Requested power, `Err` carries an unrecognized state string
    pub fn power(&self) -> Option<Result<bool, &'a str>> {
        self.state.map(|state| {
            if state.eq_ignore_ascii_case(STATE_ON) {
                Ok(true)
            } else if state.eq_ignore_ascii_case(STATE_OFF) {
                Ok(false)
            } else {
                Err(state)
            }
        })
    }

    /// Whether any color channel field is present
    pub const fn has_channels(&self) -> bool {
        self.red.is_some()
            || self.green.is_some()
            || self.blue.is_some()
            || self.ww.is_some()
            || self.cw.is_some()
    }
}

/// Saturate a JSON number into the engine's value type
pub fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Current light state as published to the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// Topology name
    pub mode: &'static str,
    pub state: &'static str,
    pub brightness: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ww: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cw: Option<u16>,
}

impl StateSnapshot {
    /// Build the snapshot, including only fields meaningful for the topology
    pub fn new(state: &LightState, config: &LightConfig) -> Self {
        let topology = config.topology;
        let is_cct = matches!(topology, Topology::Cct);
        let rgb = topology.has_rgb();
        Self {
            mode: topology.as_str(),
            state: if state.power { STATE_ON } else { STATE_OFF },
            brightness: state.brightness,
            color_mode: is_cct.then_some("color_temp"),
            color_temp: is_cct.then(|| {
                color_mix_to_mireds(state.color_mix, config.color_temperature, config.max_value)
            }),
            red: rgb.then_some(state.red),
            green: rgb.then_some(state.green),
            blue: rgb.then_some(state.blue),
            ww: topology.has_warm_white().then_some(state.warm_white),
            cw: topology.has_cold_white().then_some(state.cold_white),
        }
    }

    pub fn to_json<const N: usize>(&self) -> Result<String<N>, SnapshotError> {
        serde_json_core::to_string(self).map_err(|_| SnapshotError::BufferTooSmall)
    }
}

/// Battery telemetry of one remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteTelemetry {
    /// Battery level in percent
    pub battery: u8,
    #[serde(rename = "batteryVoltage")]
    pub battery_voltage: u16,
}

impl From<&RemoteInfo> for RemoteTelemetry {
    fn from(info: &RemoteInfo) -> Self {
        Self {
            battery: info.battery_percentage,
            battery_voltage: info.battery_mv,
        }
    }
}

impl RemoteTelemetry {
    pub fn to_json<const N: usize>(&self) -> Result<String<N>, SnapshotError> {
        serde_json_core::to_string(self).map_err(|_| SnapshotError::BufferTooSmall)
    }
}
