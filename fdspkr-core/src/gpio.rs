//! Register interface for the DIRECTION and STEP lines
//!
//! Two output lines, driven through the standard BCM283x GPIO bank layout.
//! Function-select registers hold ten pins per word (three bits each);
//! set/clear/level registers hold 32 pins per word (one bit each).

use fdspkr_hal::RegisterBlock;

use crate::config::PinConfig;
use crate::error::ConfigError;

/// GPIO register offsets (bytes from the start of the block)
pub mod reg {
    /// Function select, pins 0-9 (GPFSEL1.. follow at +4)
    pub const GPFSEL0: usize = 0x00;
    /// Output set, pins 0-31 (write 1 to drive high)
    pub const GPSET0: usize = 0x1C;
    /// Output clear, pins 0-31 (write 1 to drive low)
    pub const GPCLR0: usize = 0x28;
    /// Pin level, pins 0-31
    pub const GPLEV0: usize = 0x34;
}

/// The bank holds GPIO0-GPIO53; GPFSEL5 covers 50-53 only
pub const MAX_PINS: u8 = 54;

/// Function-select field width in bits
const FSEL_BITS: u32 = 3;
/// Function-select field mask
const FSEL_MASK: u32 = 0b111;
/// Function-select value for "output"
const FSEL_OUTPUT: u32 = 0b001;

/// One GPIO pin, located within the register block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioLine {
    pin: u8,
}

impl GpioLine {
    /// Create a line for GPIO number `pin`
    pub const fn new(pin: u8) -> Self {
        Self { pin }
    }

    /// GPIO number
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Function-select register holding this pin
    pub const fn fsel_offset(&self) -> usize {
        reg::GPFSEL0 + (self.pin as usize / 10) * 4
    }

    /// Bit position of this pin's function-select field
    pub const fn fsel_shift(&self) -> u32 {
        (self.pin as u32 % 10) * FSEL_BITS
    }

    /// Set register for this pin's bank
    pub const fn set_offset(&self) -> usize {
        reg::GPSET0 + self.bank() * 4
    }

    /// Clear register for this pin's bank
    pub const fn clear_offset(&self) -> usize {
        reg::GPCLR0 + self.bank() * 4
    }

    /// Level register for this pin's bank
    pub const fn level_offset(&self) -> usize {
        reg::GPLEV0 + self.bank() * 4
    }

    /// Single-bit mask within a set/clear/level word
    pub const fn mask(&self) -> u32 {
        1 << (self.pin as u32 % 32)
    }

    const fn bank(&self) -> usize {
        self.pin as usize / 32
    }

    fn offsets(&self) -> [usize; 4] {
        [
            self.fsel_offset(),
            self.set_offset(),
            self.clear_offset(),
            self.level_offset(),
        ]
    }
}

/// The two logical lines the actuator is driven through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Head travel direction
    Direction,
    /// Step pulse (one step per rising edge)
    Step,
}

/// Register-level access to the DIRECTION and STEP lines
///
/// Owns the register block for the lifetime of the driver. Nothing else
/// touches the registers while a `Gpio` exists.
pub struct Gpio<R> {
    regs: R,
    direction: GpioLine,
    step: GpioLine,
}

impl<R: RegisterBlock> Gpio<R> {
    /// Take ownership of a mapped register block
    ///
    /// Fails if the pins coincide, fall outside the bank layout, or the
    /// block does not cover every register either line needs.
    pub fn new(regs: R, pins: PinConfig) -> Result<Self, ConfigError> {
        if pins.direction == pins.step {
            return Err(ConfigError::SamePin);
        }
        if pins.direction >= MAX_PINS || pins.step >= MAX_PINS {
            return Err(ConfigError::PinOutOfRange);
        }

        let direction = GpioLine::new(pins.direction);
        let step = GpioLine::new(pins.step);

        let covered = direction
            .offsets()
            .iter()
            .chain(step.offsets().iter())
            .all(|&offset| regs.covers(offset));
        if !covered {
            return Err(ConfigError::RegisterBlockTooSmall);
        }

        Ok(Self {
            regs,
            direction,
            step,
        })
    }

    /// Resolve a logical line to its pin
    pub fn line(&self, line: Line) -> GpioLine {
        match line {
            Line::Direction => self.direction,
            Line::Step => self.step,
        }
    }

    /// Switch `line` to output mode
    ///
    /// Read-modify-write of the function-select word; other pins sharing
    /// the word keep their function. Idempotent.
    pub fn configure_as_output(&mut self, line: Line) {
        let l = self.line(line);
        let shift = l.fsel_shift();
        self.regs
            .modify(l.fsel_offset(), FSEL_MASK << shift, FSEL_OUTPUT << shift);
    }

    /// Drive `line` high
    pub fn set(&mut self, line: Line) {
        let l = self.line(line);
        self.regs.write(l.set_offset(), l.mask());
    }

    /// Drive `line` low
    pub fn clear(&mut self, line: Line) {
        let l = self.line(line);
        self.regs.write(l.clear_offset(), l.mask());
    }

    /// Read back the level of `line`
    pub fn is_high(&self, line: Line) -> bool {
        let l = self.line(line);
        self.regs.read(l.level_offset()) & l.mask() != 0
    }

    /// Give the register block back to its owner
    pub fn release(self) -> R {
        self.regs
    }

    #[cfg(test)]
    pub(crate) fn regs_for_test(&self) -> &R {
        &self.regs
    }
}
