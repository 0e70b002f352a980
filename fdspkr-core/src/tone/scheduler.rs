//! Tone scheduler state machine
//!
//! Two states: IDLE (nothing scheduled) and PLAYING (one deadline
//! outstanding). Every request starts from IDLE, so a new tone always
//! replaces the old one; the pulse callback only moves PLAYING forward.
//!
//! Deadlines advance from the previous *intended* firing time, never from
//! the time the callback actually ran, so dispatch latency does not
//! accumulate into pitch drift.

use fdspkr_hal::Instant;

use super::interval::{FrequencyBounds, ToneInterval};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneState {
    /// No tone, no deadline
    Idle,
    /// Tone playing, one pulse deadline outstanding
    Playing {
        /// Requested frequency
        frequency_hz: u32,
        /// Time between pulses
        interval: ToneInterval,
        /// When the next pulse is due
        next_fire: Instant,
    },
}

impl ToneState {
    /// Check if a tone is playing
    pub fn is_playing(&self) -> bool {
        matches!(self, ToneState::Playing { .. })
    }
}

/// Tone scheduler
///
/// Pure state: it decides *when* pulses happen. Arming the timer and
/// moving the head is the engine's job.
#[derive(Debug, Clone)]
pub struct ToneScheduler {
    state: ToneState,
    bounds: FrequencyBounds,
}

impl ToneScheduler {
    /// Create an idle scheduler
    pub fn new(bounds: FrequencyBounds) -> Self {
        Self {
            state: ToneState::Idle,
            bounds,
        }
    }

    /// Current state
    pub fn state(&self) -> ToneState {
        self.state
    }

    /// Playable range
    pub fn bounds(&self) -> FrequencyBounds {
        self.bounds
    }

    /// Current pulse interval, `None` when idle
    pub fn interval(&self) -> Option<ToneInterval> {
        match self.state {
            ToneState::Playing { interval, .. } => Some(interval),
            ToneState::Idle => None,
        }
    }

    /// Frequency being played, `None` when idle
    pub fn frequency_hz(&self) -> Option<u32> {
        match self.state {
            ToneState::Playing { frequency_hz, .. } => Some(frequency_hz),
            ToneState::Idle => None,
        }
    }

    /// Next pulse deadline, `None` when idle
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ToneState::Playing { next_fire, .. } => Some(next_fire),
            ToneState::Idle => None,
        }
    }

    /// Start a tone at `frequency_hz`, replacing whatever was playing
    ///
    /// Returns the first pulse deadline (one interval after `now`), or
    /// `None` if the frequency is outside the playable range, in which case
    /// the scheduler is left idle.
    pub fn start(&mut self, frequency_hz: u32, now: Instant) -> Option<Instant> {
        self.state = ToneState::Idle;

        let interval = self.bounds.interval_for(frequency_hz)?;
        let next_fire = now + interval.as_ticks();
        self.state = ToneState::Playing {
            frequency_hz,
            interval,
            next_fire,
        };
        Some(next_fire)
    }

    /// Return to idle
    ///
    /// Returns true if a tone was playing.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.state.is_playing();
        self.state = ToneState::Idle;
        was_playing
    }

    /// Account for the pulse due at the current deadline
    ///
    /// Moves the deadline forward by one interval and returns it. Does
    /// nothing when idle.
    pub fn advance(&mut self) -> Option<Instant> {
        match &mut self.state {
            ToneState::Playing {
                interval,
                next_fire,
                ..
            } => {
                *next_fire = *next_fire + interval.as_ticks();
                Some(*next_fire)
            }
            ToneState::Idle => None,
        }
    }
}

impl Default for ToneScheduler {
    fn default() -> Self {
        Self::new(FrequencyBounds::default())
    }
}
