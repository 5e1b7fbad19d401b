//! Color temperature helpers
//!
//! The engine stores color temperature as a color-mix scalar in `0..=max`.
//! Mireds map linearly onto that scalar over the device's mired range.

/// Configured color temperature range in mireds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiredRange {
    /// Coldest supported temperature (6500K = 153 mireds)
    pub min: u16,
    /// Warmest supported temperature (2700K = 370 mireds)
    pub max: u16,
}

impl MiredRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Width of the range in mireds
    pub const fn span(self) -> u16 {
        self.max.saturating_sub(self.min)
    }

    /// Clamp a mired value into the range
    pub const fn clamp(self, mireds: u16) -> u16 {
        if mireds < self.min {
            self.min
        } else if mireds > self.max {
            self.max
        } else {
            mireds
        }
    }

    pub const fn contains(self, mireds: u16) -> bool {
        mireds >= self.min && mireds <= self.max
    }
}

impl Default for MiredRange {
    fn default() -> Self {
        Self::new(153, 370)
    }
}

/// Convert mireds to the internal color-mix scalar.
///
/// Rounds half up so that the reverse conversion lands on the same mired value.
/// Input outside the range is clamped first.
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn mireds_to_color_mix(mireds: u16, range: MiredRange, max: u16) -> u16 {
    let span = range.span();
    if span == 0 {
        return 0;
    }
    let offset = (range.clamp(mireds) - range.min) as f32;
    libm::floorf(0.5 + offset * max as f32 / span as f32) as u16
}

/// Convert the internal color-mix scalar back to mireds.
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn color_mix_to_mireds(color_mix: u16, range: MiredRange, max: u16) -> u16 {
    if max == 0 {
        return range.min;
    }
    let mix = color_mix.min(max) as f32;
    libm::floorf(0.5 + mix * range.span() as f32 / max as f32 + range.min as f32) as u16
}
