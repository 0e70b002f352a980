//! Frequency to pulse-interval conversion
//!
//! Integer-only: the interval is `(TICK_RATE / f) << TICK_SHIFT` ticks
//! (nanoseconds), with the division truncating.

use crate::config::ToneConfig;

/// Dividend of the interval conversion
pub const TICK_RATE: u32 = 37_120_000;

/// Left shift applied to the quotient
pub const TICK_SHIFT: u32 = 7;

/// Time between two consecutive pulses, in timer ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneInterval {
    ticks: u64,
}

impl ToneInterval {
    /// Interval for `frequency_hz`, ignoring range limits
    ///
    /// `None` only for 0 Hz.
    pub const fn from_hz(frequency_hz: u32) -> Option<Self> {
        if frequency_hz == 0 {
            return None;
        }
        let ticks = ((TICK_RATE / frequency_hz) as u64) << TICK_SHIFT;
        Some(Self { ticks })
    }

    /// Interval length in ticks
    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }
}

/// Exclusive frequency range the actuator can reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyBounds {
    /// Exclusive lower bound in Hz
    pub min_hz: u32,
    /// Exclusive upper bound in Hz
    pub max_hz: u32,
}

impl Default for FrequencyBounds {
    fn default() -> Self {
        Self::from(&ToneConfig::default())
    }
}

impl From<&ToneConfig> for FrequencyBounds {
    fn from(config: &ToneConfig) -> Self {
        Self {
            min_hz: config.min_hz,
            max_hz: config.max_hz,
        }
    }
}

impl FrequencyBounds {
    /// Check whether `frequency_hz` lies strictly inside the bounds
    pub fn contains(&self, frequency_hz: u32) -> bool {
        frequency_hz > self.min_hz && frequency_hz < self.max_hz
    }

    /// Interval for `frequency_hz`, or `None` if it cannot be played
    pub fn interval_for(&self, frequency_hz: u32) -> Option<ToneInterval> {
        if self.contains(frequency_hz) {
            ToneInterval::from_hz(frequency_hz)
        } else {
            None
        }
    }
}
