//! Light state and its persisted record

/// Version tag of the persisted record layout
pub const RECORD_VERSION: u8 = 1;

/// Length of a full persisted record in bytes
pub const RECORD_LEN: usize = 2 + 7 * 2;

const DEFAULT_POWER: bool = true;
const DEFAULT_BRIGHTNESS: u16 = 256;

/// Numeric fields of [`LightState`], used for clamping and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Brightness,
    ColorMix,
    Red,
    Green,
    Blue,
    WarmWhite,
    ColdWhite,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::ColorMix => "color",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::WarmWhite => "ww",
            Self::ColdWhite => "cw",
        }
    }
}

/// Authoritative light state owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub power: bool,
    pub brightness: u16,
    /// Warm/cold mix for CCT lights, `0` is fully cold
    pub color_mix: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub warm_white: u16,
    pub cold_white: u16,
}

impl LightState {
    /// State used when storage holds nothing
    pub const fn new() -> Self {
        Self {
            power: DEFAULT_POWER,
            brightness: DEFAULT_BRIGHTNESS,
            color_mix: 0,
            red: 0,
            green: 0,
            blue: 0,
            warm_white: 0,
            cold_white: 0,
        }
    }

    /// Read a numeric field
    pub const fn get(&self, field: Field) -> u16 {
        match field {
            Field::Brightness => self.brightness,
            Field::ColorMix => self.color_mix,
            Field::Red => self.red,
            Field::Green => self.green,
            Field::Blue => self.blue,
            Field::WarmWhite => self.warm_white,
            Field::ColdWhite => self.cold_white,
        }
    }

    /// Write a numeric field without any validation
    pub const fn set(&mut self, field: Field, value: u16) {
        match field {
            Field::Brightness => self.brightness = value,
            Field::ColorMix => self.color_mix = value,
            Field::Red => self.red = value,
            Field::Green => self.green = value,
            Field::Blue => self.blue = value,
            Field::WarmWhite => self.warm_white = value,
            Field::ColdWhite => self.cold_white = value,
        }
    }

    /// Clamp every numeric field to `max`, returning the fields that changed
    pub fn clamp_to(&mut self, max: u16) -> heapless::Vec<Field, 7> {
        let mut clamped = heapless::Vec::new();
        for field in FIELDS {
            if self.get(field) > max {
                self.set(field, max);
                // FIELDS has exactly the vector capacity
                let _ = clamped.push(field);
            }
        }
        clamped
    }

    /// Encode into the persisted record layout.
    ///
    /// Layout: `[version][power][brightness][color][red][green][blue][ww][cw]`,
    /// numeric fields little-endian `u16`.
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[0] = RECORD_VERSION;
        record[1] = u8::from(self.power);
        for (index, field) in FIELDS.iter().enumerate() {
            let offset = 2 + index * 2;
            record[offset..offset + 2].copy_from_slice(&self.get(*field).to_le_bytes());
        }
        record
    }

    /// Decode a persisted record.
    ///
    /// Fields missing from a short record keep their defaults. Returns `None`
    /// for an empty record or an unknown version.
    pub fn from_record(record: &[u8]) -> Option<Self> {
        let (&version, rest) = record.split_first()?;
        if version != RECORD_VERSION {
            return None;
        }
        let mut state = Self::new();
        let Some((&power, numeric)) = rest.split_first() else {
            return Some(state);
        };
        state.power = power != 0;
        for (field, bytes) in FIELDS.iter().zip(numeric.chunks_exact(2)) {
            state.set(*field, u16::from_le_bytes([bytes[0], bytes[1]]));
        }
        Some(state)
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

const FIELDS: [Field; 7] = [
    Field::Brightness,
    Field::ColorMix,
    Field::Red,
    Field::Green,
    Field::Blue,
    Field::WarmWhite,
    Field::ColdWhite,
];
