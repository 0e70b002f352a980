//! Floppy head actuator driver
//!
//! The drive exposes its head stepper through two inputs: DIR selects the
//! travel direction, and every STEP pulse moves the head one track. The
//! tone itself comes from `pulse()`; calibration and parking bracket the
//! driver's lifetime.

use embedded_hal::delay::DelayNs;
use fdspkr_hal::RegisterBlock;

use crate::config::CalibrationConfig;
use crate::gpio::{Gpio, Line};

/// Head travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// DIR low: towards the calibration end stop
    Forward,
    /// DIR high: away from the end stop
    Backward,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Stepper actuator driven through the DIRECTION and STEP lines
pub struct Actuator<R, D> {
    gpio: Gpio<R>,
    delay: D,
    calibration: CalibrationConfig,
    /// Direction of the next pulse
    direction: Direction,
}

impl<R: RegisterBlock, D: DelayNs> Actuator<R, D> {
    /// Create the driver and switch both lines to output mode
    pub fn new(mut gpio: Gpio<R>, delay: D, calibration: CalibrationConfig) -> Self {
        gpio.configure_as_output(Line::Direction);
        gpio.configure_as_output(Line::Step);

        Self {
            gpio,
            delay,
            calibration,
            direction: Direction::Forward,
        }
    }

    /// Move the head to a known position
    ///
    /// Seeks into the end stop, then backs off so that pulses in either
    /// direction have room to travel. Run once before the first tone.
    pub fn calibrate(&mut self) {
        self.gpio.clear(Line::Direction);
        for _ in 0..self.calibration.seek_steps {
            self.settled_step();
        }

        self.gpio.set(Line::Direction);
        for _ in 0..self.calibration.backoff_steps {
            self.settled_step();
        }

        self.direction = Direction::Forward;
    }

    /// Emit one step, reversing direction every time
    ///
    /// No delay between STEP high and low: the pulse cadence set by the
    /// caller is the audible frequency.
    pub fn pulse(&mut self) {
        match self.direction {
            Direction::Forward => self.gpio.clear(Line::Direction),
            Direction::Backward => self.gpio.set(Line::Direction),
        }
        self.direction = self.direction.opposite();

        self.gpio.set(Line::Step);
        self.gpio.clear(Line::Step);
    }

    /// Drive both lines low before the driver goes away
    pub fn park(&mut self) {
        self.gpio.clear(Line::Direction);
        self.gpio.clear(Line::Step);
    }

    /// Direction the next pulse will travel
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Register-level access (read-back only)
    pub fn gpio(&self) -> &Gpio<R> {
        &self.gpio
    }

    /// Give the register block back to its owner
    pub fn release(self) -> R {
        self.gpio.release()
    }

    fn settled_step(&mut self) {
        self.gpio.set(Line::Step);
        self.delay.delay_us(self.calibration.settle_us);
        self.gpio.clear(Line::Step);
    }
}

/// Delay double that only accumulates the requested time
#[cfg(test)]
pub(crate) mod mock {
    use embedded_hal::delay::DelayNs;

    #[derive(Default)]
    pub struct MockDelay {
        pub total_ns: u64,
        pub calls: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.calls += 1;
        }
    }
}
