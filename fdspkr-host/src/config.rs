//! TOML configuration
//!
//! ```toml
//! [pins]
//! direction = "GPIO23"   # or a bare number: 23
//! step = 24
//!
//! [tone]
//! min_hz = 50
//! max_hz = 1050
//! bell_hz = 1000
//!
//! [calibration]
//! seek_steps = 4
//! backoff_steps = 2
//! settle_us = 10
//! ```
//!
//! Every table and key is optional; missing values take the reference
//! defaults.

use std::fs;
use std::path::Path;

use fdspkr_core::config::{CalibrationConfig, PinConfig, ToneConfig};
use fdspkr_core::SpeakerConfig;
use fdspkr_hal_bcm2835::{parse_pin, validate_pin};
use log::debug;
use serde::Deserialize;

use crate::error::Error;

/// On-disk layout; pins may be written as numbers or `GPIOn` names
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    pins: PinsTable,
    tone: ToneConfig,
    calibration: CalibrationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PinsTable {
    direction: PinValue,
    step: PinValue,
}

impl Default for PinsTable {
    fn default() -> Self {
        let pins = PinConfig::default();
        Self {
            direction: PinValue::Number(pins.direction),
            step: PinValue::Number(pins.step),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PinValue {
    Number(u8),
    Name(String),
}

impl PinValue {
    fn resolve(&self) -> Result<u8, Error> {
        match self {
            PinValue::Number(pin) => validate_pin(*pin).map_err(|reason| Error::Pin {
                pin: *pin,
                reason,
            }),
            PinValue::Name(name) => parse_pin(name).map_err(|reason| Error::PinName {
                name: name.clone(),
                reason,
            }),
        }
    }
}

/// Parse and validate a TOML configuration document
pub fn parse_config(text: &str) -> Result<SpeakerConfig, Error> {
    let file: ConfigFile = toml::from_str(text)?;

    let config = SpeakerConfig {
        pins: PinConfig {
            direction: file.pins.direction.resolve()?,
            step: file.pins.step.resolve()?,
        },
        tone: file.tone,
        calibration: file.calibration,
    };
    config.validate()?;

    debug!(
        "config: DIR=GPIO{} STEP=GPIO{} range=({}, {}) Hz bell={} Hz",
        config.pins.direction,
        config.pins.step,
        config.tone.min_hz,
        config.tone.max_hz,
        config.tone.bell_hz
    );
    Ok(config)
}

/// Read and validate a TOML configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<SpeakerConfig, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}
