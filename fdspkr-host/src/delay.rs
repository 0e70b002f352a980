//! Busy-wait delay
//!
//! Calibration only needs a few microseconds of settle time per step,
//! far below what `thread::sleep` can deliver reliably, so spin instead.

use std::hint;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

/// Spinning [`DelayNs`] on the monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinDelay;

impl SpinDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let until = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < until {
            hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_at_least_requested() {
        let mut delay = SpinDelay::new();
        let start = Instant::now();
        delay.delay_us(200);
        assert!(start.elapsed() >= Duration::from_micros(200));
    }
}
