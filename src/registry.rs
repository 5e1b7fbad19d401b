//! Registry of remotes seen over the radio.
//!
//! Entries are created on first sighting and refreshed on every frame; they are
//! never evicted.

use alloc::collections::BTreeMap;
use core::fmt::Write;

use heapless::String;

use crate::remote::battery_percentage;

/// Last known telemetry of a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteInfo {
    pub uuid: [u8; 4],
    /// Battery level in percent
    pub battery_percentage: u8,
    pub battery_mv: u16,
}

impl RemoteInfo {
    /// Uppercase hex id used in topic names
    pub fn uuid_hex(&self) -> String<8> {
        uuid_hex(&self.uuid)
    }
}

/// Result of [`RemoteRegistry::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The remote had not been seen before
    pub is_new: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RemoteRegistry {
    remotes: BTreeMap<u32, RemoteInfo>,
}

impl RemoteRegistry {
    pub const fn new() -> Self {
        Self {
            remotes: BTreeMap::new(),
        }
    }

    /// Record a sighting, replacing any previous telemetry
    pub fn observe(&mut self, uuid: [u8; 4], battery_raw: u8, battery_mv: u16) -> Observation {
        let info = RemoteInfo {
            uuid,
            battery_percentage: battery_percentage(battery_raw),
            battery_mv,
        };
        let is_new = self.remotes.insert(registry_key(&uuid), info).is_none();
        Observation { is_new }
    }

    pub fn get(&self, uuid: &[u8; 4]) -> Option<&RemoteInfo> {
        self.remotes.get(&registry_key(uuid))
    }

    /// Known remotes in key order
    pub fn iter(&self) -> impl Iterator<Item = &RemoteInfo> {
        self.remotes.values()
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}

/// Registry key: the uuid bytes read as a little-endian integer
pub const fn registry_key(uuid: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*uuid)
}

/// Format a uuid as eight uppercase hex digits
pub fn uuid_hex(uuid: &[u8; 4]) -> String<8> {
    let mut out = String::new();
    for byte in uuid {
        // Eight digits always fit
        let _ = write!(out, "{byte:02X}");
    }
    out
}
