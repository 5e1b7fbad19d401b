//! Radio receive plumbing and persisted radio settings.

use core::fmt::{self, Write};

use heapless::{String, Vec};
use log::{error, info};

use crate::channel::{Channel, Receiver, Sender, TrySendError};
use crate::frame::MAX_FRAME_LEN;
use crate::storage::Store;

/// Default RF channel
pub const DEFAULT_RADIO_CHANNEL: u8 = 100;

/// Queue depth between the receive context and the frame decoder
pub const PACKET_QUEUE_SIZE: usize = 8;

/// Raw packet as read from the radio
pub type RawPacket = Vec<u8, MAX_FRAME_LEN>;

/// Type alias for the packet queue
pub type PacketQueue = Channel<RawPacket, PACKET_QUEUE_SIZE>;

/// Type alias for the receive side producer
pub type PacketSender<'a> = Sender<'a, RawPacket, PACKET_QUEUE_SIZE>;

/// Type alias for the decoder side consumer
pub type PacketReceiver<'a> = Receiver<'a, RawPacket, PACKET_QUEUE_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// Packet exceeds the largest radio frame
    Oversized(usize),
    /// Decoder is not keeping up
    QueueFull,
}

impl fmt::Display for EnqueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversized(len) => write!(f, "packet of {len} bytes exceeds {MAX_FRAME_LEN}"),
            Self::QueueFull => f.write_str("packet queue full"),
        }
    }
}

impl core::error::Error for EnqueueError {}

/// Copy a received buffer into the packet queue
pub fn enqueue_packet(sender: &PacketSender<'_>, bytes: &[u8]) -> Result<(), EnqueueError> {
    let packet = RawPacket::from_slice(bytes).map_err(|()| EnqueueError::Oversized(bytes.len()))?;
    sender
        .try_send(packet)
        .map_err(|TrySendError(_)| EnqueueError::QueueFull)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// Not five colon-separated hex bytes
    Format,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("radio address must look like XX:XX:XX:XX:XX")
    }
}

impl core::error::Error for AddressError {}

/// Persisted radio configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioSettings {
    pub channel: u8,
    /// Address of the reading pipe
    pub address: [u8; 5],
}

impl RadioSettings {
    /// Defaults derived from the device MAC: bytes 1..6 form the address
    pub const fn from_mac(mac: [u8; 6]) -> Self {
        Self {
            channel: DEFAULT_RADIO_CHANNEL,
            address: [mac[1], mac[2], mac[3], mac[4], mac[5]],
        }
    }

    /// Address formatted as `XX:XX:XX:XX:XX`
    pub fn address_string(&self) -> String<14> {
        let mut out = String::new();
        for (index, byte) in self.address.iter().enumerate() {
            let separator = if index == 0 { "" } else { ":" };
            // 14 characters always fit
            let _ = write!(out, "{separator}{byte:02X}");
        }
        out
    }

    /// Parse an address formatted as `XX:XX:XX:XX:XX`
    pub fn parse_address(s: &str) -> Result<[u8; 5], AddressError> {
        let mut address = [0u8; 5];
        let mut parts = s.split(':');
        for byte in &mut address {
            let part = parts.next().ok_or(AddressError::Format)?;
            if part.len() != 2 {
                return Err(AddressError::Format);
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| AddressError::Format)?;
        }
        if parts.next().is_some() {
            return Err(AddressError::Format);
        }
        Ok(address)
    }
}

/// Load radio settings, falling back to MAC-derived defaults
pub fn load_radio_settings<S: Store<RadioSettings>>(store: &mut S, mac: [u8; 6]) -> RadioSettings {
    let settings = match store.load() {
        Ok(Some(settings)) => settings,
        Ok(None) => RadioSettings::from_mac(mac),
        Err(e) => {
            error!("radio: cannot load settings, using defaults: {}", e);
            RadioSettings::from_mac(mac)
        }
    };
    info!(
        "radio: loaded settings channel={} address={}",
        settings.channel,
        settings.address_string()
    );
    settings
}

/// Parse, persist and return new radio settings.
///
/// The caller restarts the radio with the returned settings. A storage
/// failure is logged; the new settings still apply until reboot.
pub fn update_radio_settings<S: Store<RadioSettings>>(
    store: &mut S,
    channel: u8,
    address: &str,
) -> Result<RadioSettings, AddressError> {
    let settings = RadioSettings {
        channel,
        address: RadioSettings::parse_address(address)?,
    };
    info!(
        "radio: settings updated channel={} address={}",
        settings.channel,
        settings.address_string()
    );
    if let Err(e) = store.save(&settings) {
        error!("radio: error persisting settings: {}", e);
    }
    Ok(settings)
}
