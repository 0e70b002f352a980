//! Configuration types
//!
//! Board-agnostic speaker configuration. The defaults describe the
//! reference build: a 3.5" drive wired to GPIO23 (DIR) and GPIO24 (STEP).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tone::interval::TICK_RATE;

/// DIRECTION/STEP pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PinConfig {
    /// GPIO driving the drive's DIR input
    pub direction: u8,
    /// GPIO driving the drive's STEP input
    pub step: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            direction: 23,
            step: 24,
        }
    }
}

/// Playable frequency range and bell pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ToneConfig {
    /// Exclusive lower bound in Hz
    pub min_hz: u32,
    /// Exclusive upper bound in Hz
    pub max_hz: u32,
    /// Pitch played for a non-zero bell request
    pub bell_hz: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            min_hz: 50,
            max_hz: 1050,
            bell_hz: 1000,
        }
    }
}

/// Start-up calibration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CalibrationConfig {
    /// Steps towards the end stop (enough to reach it from anywhere near)
    pub seek_steps: u8,
    /// Steps back off the end stop
    pub backoff_steps: u8,
    /// Settle time between STEP high and STEP low, in microseconds
    pub settle_us: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            seek_steps: 4,
            backoff_steps: 2,
            settle_us: 10,
        }
    }
}

/// Complete speaker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeakerConfig {
    /// Pin assignment
    pub pins: PinConfig,
    /// Frequency range
    pub tone: ToneConfig,
    /// Calibration sequence
    pub calibration: CalibrationConfig,
}

impl SpeakerConfig {
    /// Check the configuration for internal consistency
    ///
    /// Board-specific pin limits are checked by the platform crate; here we
    /// only reject what no board could drive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pins.direction == self.pins.step {
            return Err(ConfigError::SamePin);
        }

        let tone = &self.tone;
        // (min, max) must contain at least one integer, and the tick
        // division needs a non-zero quotient at the top of the range
        if tone.min_hz.saturating_add(1) >= tone.max_hz || tone.max_hz > TICK_RATE {
            return Err(ConfigError::InvalidBounds);
        }
        if tone.bell_hz <= tone.min_hz || tone.bell_hz >= tone.max_hz {
            return Err(ConfigError::BellOutOfRange);
        }

        Ok(())
    }
}
