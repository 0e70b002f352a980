//! Register block abstraction
//!
//! A register block is a contiguous, pre-mapped range of 32-bit hardware
//! registers. Mapping and unmapping are done by whoever owns the block;
//! implementations only move words in and out.

/// Contiguous block of 32-bit memory-mapped registers
///
/// Offsets are in bytes from the start of the block and must be 4-byte
/// aligned. Callers check offsets against [`RegisterBlock::size`] once up
/// front; accesses themselves cannot fail.
pub trait RegisterBlock {
    /// Read the 32-bit register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the 32-bit register at `offset`
    fn write(&mut self, offset: usize, value: u32);

    /// Size of the mapped region in bytes
    fn size(&self) -> usize;

    /// Check whether a register at `offset` lies inside the block
    fn covers(&self, offset: usize) -> bool {
        offset % 4 == 0 && offset.saturating_add(4) <= self.size()
    }

    /// Read-modify-write the register at `offset`
    ///
    /// Bits in `mask` are replaced by the matching bits of `value`.
    fn modify(&mut self, offset: usize, mask: u32, value: u32) {
        let current = self.read(offset);
        self.write(offset, (current & !mask) | (value & mask));
    }
}

impl<R: RegisterBlock + ?Sized> RegisterBlock for &mut R {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}
