//! Output channel topologies
//!
//! The topology is fixed per device build and decides how many physical
//! channels are driven and which parts of the light state are meaningful.

use core::fmt;

const TOPOLOGY_ID_SINGLE: u8 = 0;
const TOPOLOGY_ID_CCT: u8 = 1;
const TOPOLOGY_ID_RGB: u8 = 2;
const TOPOLOGY_ID_RGBW: u8 = 3;
const TOPOLOGY_ID_RGBWW: u8 = 4;

const TOPOLOGY_NAME_SINGLE: &str = "SINGLE";
const TOPOLOGY_NAME_CCT: &str = "CCT";
const TOPOLOGY_NAME_RGB: &str = "RGB";
const TOPOLOGY_NAME_RGBW: &str = "RGBW";
const TOPOLOGY_NAME_RGBWW: &str = "RGBWW";

/// Largest channel count of any topology
pub const MAX_CHANNELS: usize = 5;

/// Physical channel arrangement of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Topology {
    /// One dimmable channel
    Single = TOPOLOGY_ID_SINGLE,
    /// Warm white + cold white
    Cct = TOPOLOGY_ID_CCT,
    /// Red, green, blue
    Rgb = TOPOLOGY_ID_RGB,
    /// Red, green, blue, white
    Rgbw = TOPOLOGY_ID_RGBW,
    /// Red, green, blue, warm white, cold white
    Rgbww = TOPOLOGY_ID_RGBWW,
}

/// Error returned when a raw topology value is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// Unknown numeric topology id
    Unknown(u8),
    /// Unknown topology name
    UnknownName,
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "unknown topology id {id}"),
            Self::UnknownName => f.write_str("unknown topology name"),
        }
    }
}

impl core::error::Error for TopologyError {}

impl Topology {
    /// Parse a topology from its numeric id
    pub const fn from_raw(value: u8) -> Result<Self, TopologyError> {
        Ok(match value {
            TOPOLOGY_ID_SINGLE => Self::Single,
            TOPOLOGY_ID_CCT => Self::Cct,
            TOPOLOGY_ID_RGB => Self::Rgb,
            TOPOLOGY_ID_RGBW => Self::Rgbw,
            TOPOLOGY_ID_RGBWW => Self::Rgbww,
            _ => return Err(TopologyError::Unknown(value)),
        })
    }

    /// Parse a topology from its mode name (case-insensitive)
    pub fn parse_from_str(s: &str) -> Result<Self, TopologyError> {
        [Self::Single, Self::Cct, Self::Rgb, Self::Rgbw, Self::Rgbww]
            .into_iter()
            .find(|topology| topology.as_str().eq_ignore_ascii_case(s))
            .ok_or(TopologyError::UnknownName)
    }

    /// Numeric id of the topology
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Mode name published alongside the light state
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => TOPOLOGY_NAME_SINGLE,
            Self::Cct => TOPOLOGY_NAME_CCT,
            Self::Rgb => TOPOLOGY_NAME_RGB,
            Self::Rgbw => TOPOLOGY_NAME_RGBW,
            Self::Rgbww => TOPOLOGY_NAME_RGBWW,
        }
    }

    /// Number of physical channels driven by this topology
    pub const fn channel_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Cct => 2,
            Self::Rgb => 3,
            Self::Rgbw => 4,
            Self::Rgbww => 5,
        }
    }

    /// Color mode advertised to home automation for this topology
    pub const fn color_mode(self) -> &'static str {
        match self {
            Self::Single => "brightness",
            Self::Cct => "color_temp",
            Self::Rgb => "rgb",
            Self::Rgbw => "rgbw",
            Self::Rgbww => "rgbww",
        }
    }

    /// Whether red, green and blue channels are meaningful
    pub const fn has_rgb(self) -> bool {
        matches!(self, Self::Rgb | Self::Rgbw | Self::Rgbww)
    }

    /// Whether the warm white channel is meaningful
    pub const fn has_warm_white(self) -> bool {
        matches!(self, Self::Rgbw | Self::Rgbww)
    }

    /// Whether the cold white channel is meaningful
    pub const fn has_cold_white(self) -> bool {
        matches!(self, Self::Rgbww)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
