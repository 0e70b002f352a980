//! Volatile access to a mapped GPIO register block
//!
//! The BCM283x GPIO block is 0xB4 bytes of 32-bit registers starting at
//! the peripheral base + 0x20_0000. Userspace usually maps it through
//! `/dev/gpiomem`, which exposes the block at offset 0.

use core::ptr::{read_volatile, write_volatile, NonNull};

use fdspkr_hal::RegisterBlock;

/// Size of the GPIO register block in bytes
pub const GPIO_BLOCK_SIZE: usize = 0xB4;

/// Errors when wrapping a mapped region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MmioError {
    /// Base pointer is not 4-byte aligned
    Misaligned,
    /// Region is too small to hold a single register
    TooSmall,
}

/// Mapped register region accessed with volatile reads and writes
///
/// Does not own the mapping: whoever mapped the region keeps it alive for
/// as long as this value exists and unmaps it afterwards.
#[derive(Debug)]
pub struct MmioRegisters {
    base: NonNull<u32>,
    len: usize,
}

// The block is plain device memory; moving the handle to another thread
// is fine as long as only one owner touches it at a time (`&mut` writes).
unsafe impl Send for MmioRegisters {}

impl MmioRegisters {
    /// Wrap a mapped register region
    ///
    /// # Safety
    ///
    /// `base` must point to `len` bytes of mapped device memory that stay
    /// mapped, and are not accessed through any other handle, for the
    /// whole lifetime of the returned value.
    pub unsafe fn new(base: NonNull<u32>, len: usize) -> Result<Self, MmioError> {
        if base.as_ptr() as usize % 4 != 0 {
            return Err(MmioError::Misaligned);
        }
        if len < 4 {
            return Err(MmioError::TooSmall);
        }
        Ok(Self { base, len })
    }

    /// Base pointer of the region
    pub fn base(&self) -> NonNull<u32> {
        self.base
    }

    fn word(&self, offset: usize) -> *mut u32 {
        assert!(self.covers(offset), "register offset {offset:#x} out of block");
        // Offset is in bounds and aligned, checked above
        unsafe { self.base.as_ptr().add(offset / 4) }
    }
}

impl RegisterBlock for MmioRegisters {
    fn read(&self, offset: usize) -> u32 {
        let ptr = self.word(offset);
        unsafe { read_volatile(ptr) }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let ptr = self.word(offset);
        unsafe { write_volatile(ptr, value) }
    }

    fn size(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ordinary memory stands in for the device block
    fn block(words: &mut [u32]) -> MmioRegisters {
        let len = words.len() * 4;
        let base = NonNull::new(words.as_mut_ptr()).unwrap();
        unsafe { MmioRegisters::new(base, len).unwrap() }
    }

    #[test]
    fn test_read_write() {
        let mut words = [0u32; GPIO_BLOCK_SIZE / 4];
        {
            let mut regs = block(&mut words);
            regs.write(0x1C, 1 << 24);
            regs.write(0x28, 1 << 23);
            assert_eq!(regs.read(0x1C), 1 << 24);
            assert_eq!(regs.size(), GPIO_BLOCK_SIZE);
        }
        assert_eq!(words[7], 1 << 24);
        assert_eq!(words[10], 1 << 23);
    }

    #[test]
    fn test_rejects_tiny_region() {
        let mut word = [0u32; 1];
        let base = NonNull::new(word.as_mut_ptr()).unwrap();
        assert_eq!(
            unsafe { MmioRegisters::new(base, 2) }.unwrap_err(),
            MmioError::TooSmall
        );
    }

    #[test]
    fn test_rejects_misaligned_base() {
        let mut words = [0u32; 2];
        let unaligned = (words.as_mut_ptr() as usize + 1) as *mut u32;
        let base = NonNull::new(unaligned).unwrap();
        assert_eq!(
            unsafe { MmioRegisters::new(base, 4) }.unwrap_err(),
            MmioError::Misaligned
        );
    }

    #[test]
    #[should_panic]
    fn test_out_of_block_access_panics() {
        let mut words = [0u32; 2];
        let regs = block(&mut words);
        let _ = regs.read(8);
    }
}
