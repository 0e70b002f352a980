//! Board-agnostic core logic for the Floppy Disk Speaker
//!
//! A floppy drive's head actuator is a stepper motor. Stepping it back and
//! forth at a steady cadence makes it click at that cadence, which is close
//! enough to a tone to play a tune. This crate contains everything that
//! does not depend on a particular board or OS:
//!
//! - Register interface for the DIRECTION and STEP GPIO lines
//! - Actuator driver (calibration, single pulse, parking)
//! - Tone scheduler: frequency-to-interval conversion and the
//!   self-rescheduling pulse callback
//! - Tone request adapter for SOUND input events
//! - Configuration and error types

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod config;
pub mod error;
pub mod gpio;
pub mod input;
pub mod tone;

pub use actuator::{Actuator, Direction};
pub use config::SpeakerConfig;
pub use error::{ConfigError, Error};
pub use gpio::{Gpio, GpioLine, Line};
pub use input::{DeviceInfo, SoundInput, ToneRequest};
pub use tone::{ToneEngine, ToneInterval, ToneScheduler, ToneState};

/// Driver name as registered with the host
pub const DRIVER_NAME: &str = "fdspkr";

/// Driver version
pub const DRIVER_VERSION: &str = "0.1";
