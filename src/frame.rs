//! Radio frame codec
//!
//! Frame layout:
//! ```text
//! [version: 1]
//! [uuid: 4]
//! [sequence: 1]
//! [type: 1]
//! [payload: 0..=23]
//! [checksum: 2 LE]
//! ```
//! The checksum is the 16-bit wrapping sum of the version, uuid, sequence and
//! payload bytes. The type byte is not covered.

use core::fmt;

use heapless::Vec;
use log::warn;

/// Fixed bytes around the payload
pub const FRAME_OVERHEAD: usize = 1 + 4 + 1 + 1 + 2;

/// Smallest valid frame (empty payload)
pub const MIN_FRAME_LEN: usize = FRAME_OVERHEAD;

/// Largest frame the radio delivers
pub const MAX_FRAME_LEN: usize = 32;

/// Largest payload that fits a frame
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - FRAME_OVERHEAD;

const MESSAGE_TYPE_EMPTY: u8 = 0;
const MESSAGE_TYPE_REMOTE: u8 = 1;

/// Message type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Empty,
    /// Remote control event, payload is a [`crate::remote::RemotePayload`]
    Remote,
    Unknown(u8),
}

impl MessageKind {
    pub const fn from_raw(value: u8) -> Self {
        match value {
            MESSAGE_TYPE_EMPTY => Self::Empty,
            MESSAGE_TYPE_REMOTE => Self::Remote,
            other => Self::Unknown(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Empty => MESSAGE_TYPE_EMPTY,
            Self::Remote => MESSAGE_TYPE_REMOTE,
            Self::Unknown(value) => value,
        }
    }
}

/// Length of a received buffer is out of bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    TooShort(usize),
    TooLarge(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(len) => write!(f, "frame too short: {len} bytes"),
            Self::TooLarge(len) => write!(f, "frame too large: {len} bytes"),
        }
    }
}

impl core::error::Error for DecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Payload does not fit in a frame
    PayloadTooLarge(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLarge(len) => {
                write!(f, "payload of {len} bytes exceeds {MAX_PAYLOAD_LEN}")
            }
        }
    }
}

impl core::error::Error for EncodeError {}

/// Decoded radio frame.
///
/// A frame with a checksum mismatch is still returned with `valid == false`;
/// callers must check [`RadioFrame::is_valid`] before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioFrame {
    pub version: u8,
    pub uuid: [u8; 4],
    pub sequence: u8,
    pub kind: MessageKind,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
    /// Checksum carried by the frame
    pub checksum: u16,
    valid: bool,
}

impl RadioFrame {
    /// Whether the carried checksum matches the frame contents
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Sender id as used by the remote registry
    pub const fn sender_id(&self) -> u32 {
        u32::from_le_bytes(self.uuid)
    }
}

/// Additive checksum over the covered frame fields
pub fn checksum(version: u8, uuid: &[u8; 4], sequence: u8, payload: &[u8]) -> u16 {
    core::iter::once(&version)
        .chain(uuid)
        .chain(core::iter::once(&sequence))
        .chain(payload)
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)))
}

/// Decode a received buffer into a frame
pub fn decode(bytes: &[u8]) -> Result<RadioFrame, DecodeError> {
    if bytes.len() < MIN_FRAME_LEN {
        warn!("radio: frame too short: {}", bytes.len());
        return Err(DecodeError::TooShort(bytes.len()));
    }
    if bytes.len() > MAX_FRAME_LEN {
        warn!("radio: frame too large: {}", bytes.len());
        return Err(DecodeError::TooLarge(bytes.len()));
    }

    let (body, trailer) = bytes.split_at(bytes.len() - 2);
    let version = body[0];
    let uuid = [body[1], body[2], body[3], body[4]];
    let sequence = body[5];
    let kind = MessageKind::from_raw(body[6]);
    let payload_bytes = &body[7..];
    let received = u16::from_le_bytes([trailer[0], trailer[1]]);
    let computed = checksum(version, &uuid, sequence, payload_bytes);

    let valid = computed == received;
    if !valid {
        warn!(
            "radio: checksum mismatch {:04X} != {:04X}",
            computed, received
        );
    }

    // Length checked above, the payload always fits
    let payload = Vec::from_slice(payload_bytes).unwrap_or_default();

    Ok(RadioFrame {
        version,
        uuid,
        sequence,
        kind,
        payload,
        checksum: received,
        valid,
    })
}

/// Build a frame with a correct checksum
pub fn encode(
    version: u8,
    uuid: [u8; 4],
    sequence: u8,
    kind: MessageKind,
    payload: &[u8],
) -> Result<Vec<u8, MAX_FRAME_LEN>, EncodeError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLarge(payload.len()));
    }

    let mut frame = Vec::new();
    let sum = checksum(version, &uuid, sequence, payload);
    // Capacity is MAX_FRAME_LEN and the payload length was checked above
    let _ = frame.push(version);
    let _ = frame.extend_from_slice(&uuid);
    let _ = frame.push(sequence);
    let _ = frame.push(kind.as_u8());
    let _ = frame.extend_from_slice(payload);
    let _ = frame.extend_from_slice(&sum.to_le_bytes());
    Ok(frame)
}
