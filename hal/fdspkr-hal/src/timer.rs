//! Tone timer abstraction
//!
//! The tone callback is driven by a monotonic one-shot timer that lives
//! outside normal program flow (an interrupt, a dedicated thread, ...).
//! The core only needs to read the clock, arm a single deadline and
//! cancel it again.

use core::ops::{Add, Sub};

/// Monotonic clock ticks per second (one tick = one nanosecond)
pub const TICKS_PER_SECOND: u64 = 1_000_000_000;

/// A point on the timer's monotonic clock
///
/// The epoch is arbitrary (typically timer start-up); only differences
/// between instants of the same timer are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant {
    ticks: u64,
}

impl Instant {
    /// The clock epoch
    pub const ZERO: Instant = Instant { ticks: 0 };

    /// Create an instant from raw ticks since the epoch
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Raw ticks since the epoch
    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }

    /// Add `ticks`, returning `None` on overflow
    pub const fn checked_add_ticks(self, ticks: u64) -> Option<Self> {
        match self.ticks.checked_add(ticks) {
            Some(ticks) => Some(Self { ticks }),
            None => None,
        }
    }

    /// Ticks elapsed from `earlier` to `self`, zero if `earlier` is later
    pub const fn ticks_since(&self, earlier: Instant) -> u64 {
        self.ticks.saturating_sub(earlier.ticks)
    }
}

impl Add<u64> for Instant {
    type Output = Instant;

    /// Saturates at the end of the clock rather than wrapping
    fn add(self, ticks: u64) -> Instant {
        Instant {
            ticks: self.ticks.saturating_add(ticks),
        }
    }
}

impl Sub for Instant {
    type Output = u64;

    fn sub(self, earlier: Instant) -> u64 {
        self.ticks_since(earlier)
    }
}

/// Errors reported by a timer facility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No timer resource is available to arm a callback
    Exhausted,
    /// The timer facility has been shut down
    Shutdown,
}

/// Monotonic one-shot timer facility
///
/// At most one deadline is armed at a time: arming replaces any previous
/// deadline. When the deadline passes, the implementation dispatches the
/// owner's callback exactly once; the callback re-arms if it wants to run
/// again.
pub trait ToneTimer {
    /// Current time on the timer's monotonic clock
    fn now(&self) -> Instant;

    /// Arm the timer to fire at `deadline`
    ///
    /// A deadline in the past fires as soon as possible.
    fn arm(&mut self, deadline: Instant) -> Result<(), TimerError>;

    /// Cancel the armed deadline, if any
    ///
    /// This is a barrier: once `cancel` returns, a callback belonging to
    /// the cancelled deadline will not run.
    fn cancel(&mut self);

    /// Check whether a deadline is currently armed
    fn is_armed(&self) -> bool;
}
