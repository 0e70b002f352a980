//! Error types
//!
//! Hardware-proximate failures (register block, timer) are reported to the
//! driver's owner. Logical validation failures are absorbed: an unsupported
//! event is a rejection, an out-of-range frequency is not an error at all.

use fdspkr_hal::TimerError;

/// Configuration errors, detected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Register block does not cover the registers a line needs
    RegisterBlockTooSmall,
    /// Pin number not usable on this board
    PinOutOfRange,
    /// DIRECTION and STEP configured on the same pin
    SamePin,
    /// Frequency bounds are empty or too large for the tick arithmetic
    InvalidBounds,
    /// Bell frequency falls outside the playable range
    BellOutOfRange,
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Driver cannot be initialized with this configuration/hardware
    Configuration(ConfigError),
    /// Event kind/code the speaker does not handle
    UnsupportedEvent {
        /// Event type (`EV_*`)
        kind: u16,
        /// Event code
        code: u16,
    },
    /// Timer facility could not arm the pulse callback
    TimerScheduling(TimerError),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Configuration(e)
    }
}

impl From<TimerError> for Error {
    fn from(e: TimerError) -> Self {
        Error::TimerScheduling(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::RegisterBlockTooSmall => "register block too small for configured pins",
            ConfigError::PinOutOfRange => "pin out of range",
            ConfigError::SamePin => "direction and step share a pin",
            ConfigError::InvalidBounds => "invalid frequency bounds",
            ConfigError::BellOutOfRange => "bell frequency outside playable range",
        };
        f.write_str(msg)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "configuration error: {e}"),
            Error::UnsupportedEvent { kind, code } => {
                write!(f, "unsupported event type {kind:#x} code {code}")
            }
            Error::TimerScheduling(e) => write!(f, "timer scheduling failed: {e:?}"),
        }
    }
}
