//! Floppy Disk Speaker runtime for Linux userspace
//!
//! Wires the board-agnostic core to a real clock:
//!
//! - [`timer::ThreadTimer`]: one-shot timer served by a dedicated dispatch
//!   thread, with a generation counter so cancelled deadlines never fire
//! - [`delay::SpinDelay`]: busy-wait microsecond delay for calibration
//! - [`speaker::Speaker`]: the driver context (bring-up, tone requests,
//!   input events, teardown)
//! - [`config`]: TOML configuration loading
//!
//! The register block must already be mapped (e.g. from `/dev/gpiomem`);
//! the caller keeps the mapping alive until [`Speaker::shutdown`] hands the
//! block back.

pub mod config;
pub mod delay;
pub mod error;
pub mod speaker;
pub mod timer;

pub use config::{load_config, parse_config};
pub use error::Error;
pub use speaker::Speaker;
pub use timer::{Expiry, ThreadTimer};

pub use fdspkr_core::{DeviceInfo, SoundInput, SpeakerConfig, DRIVER_NAME, DRIVER_VERSION};
