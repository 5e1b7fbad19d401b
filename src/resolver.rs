//! Topology resolver
//!
//! Pure mapping from [`LightState`] to per-channel target duty values.
//! Integer math truncates exactly like the deployed firmware; do not
//! replace it with rounding.

use core::fmt;

use crate::state::LightState;
use crate::topology::Topology;

/// Fixed divisor that normalizes brightness in the color topologies
pub const COLOR_BRIGHTNESS_DIVISOR: u32 = 65535;

/// Target duty value per physical channel
pub type ChannelTargets<const N: usize> = [u16; N];

/// Error returned when targets cannot be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// The topology needs more channels than the output provides
    UnsupportedTopology { topology: Topology, channels: usize },
    /// Resolution ceiling of zero, CCT split would divide by zero
    ZeroResolution,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTopology { topology, channels } => write!(
                f,
                "topology {topology} needs {} channels, output has {channels}",
                topology.channel_count()
            ),
            Self::ZeroResolution => f.write_str("resolution ceiling is zero"),
        }
    }
}

impl core::error::Error for ResolveError {}

/// Resolve target duty values for every physical channel.
///
/// Channels the topology does not use are always zero.
#[allow(clippy::cast_possible_truncation)]
pub fn resolve<const N: usize>(
    state: &LightState,
    topology: Topology,
    max_value: u16,
) -> Result<ChannelTargets<N>, ResolveError> {
    if topology.channel_count() > N {
        return Err(ResolveError::UnsupportedTopology {
            topology,
            channels: N,
        });
    }

    let power = u32::from(state.power);
    let brightness = u32::from(state.brightness);
    let mut targets = [0u16; N];

    match topology {
        Topology::Single => {
            targets[0] = (power * brightness) as u16;
        }
        Topology::Cct => {
            if max_value == 0 {
                return Err(ResolveError::ZeroResolution);
            }
            let scale = u32::from(max_value);
            let mix = u32::from(state.color_mix).min(scale);
            let warm = brightness * mix / scale;
            let cold = brightness * scale.saturating_sub(mix) / scale;
            targets[0] = (power * warm) as u16;
            targets[1] = (power * cold) as u16;
        }
        Topology::Rgb | Topology::Rgbw | Topology::Rgbww => {
            let colors = [
                state.red,
                state.green,
                state.blue,
                state.warm_white,
                state.cold_white,
            ];
            let count = topology.channel_count();
            for (target, color) in targets.iter_mut().zip(colors).take(count) {
                *target = (power * brightness / COLOR_BRIGHTNESS_DIVISOR * u32::from(color)) as u16;
            }
        }
    }

    Ok(targets)
}
