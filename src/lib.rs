#![no_std]

extern crate alloc;

pub mod channel;
pub mod color;
pub mod config;
pub mod engine;
pub mod frame;
pub mod network;
pub mod radio;
pub mod registry;
pub mod remote;
pub mod resolver;
pub mod router;
pub mod state;
pub mod storage;
pub mod ticker;
pub mod topology;
pub mod transition;

pub use color::MiredRange;
pub use config::{ConfigError, LightConfig};
pub use engine::{
    ChangeChannel, ChangeReceiver, ChangeSender, LightChange, LightEngine, LightError,
    SharedEngine,
};
pub use frame::{MessageKind, RadioFrame};
pub use network::{LightCommand, RemoteTelemetry, StateSnapshot};
pub use radio::{PacketQueue, PacketReceiver, PacketSender, RadioSettings};
pub use registry::{RemoteInfo, RemoteRegistry};
pub use remote::{RemoteEvent, RemotePayload};
pub use resolver::resolve;
pub use router::{
    ButtonAction, ButtonBehavior, EventRouter, PacketOutcome, RemoteNotice, RemoteNoticeChannel,
};
pub use state::{Field, LightState};
pub use storage::{RamStore, StorageError, Store};
pub use ticker::{LightTicker, OutputDriver, TickResult};
pub use topology::Topology;
pub use transition::TransitionScheduler;

pub use embassy_time::{Duration, Instant};

/// Install the esp-println logger as the `log` backend
#[cfg(feature = "esp32-log")]
pub fn init_logger(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
