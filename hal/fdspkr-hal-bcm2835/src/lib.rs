//! BCM283x-specific HAL for the Floppy Disk Speaker
//!
//! This crate provides the Raspberry Pi implementation of the shared
//! `fdspkr-hal` traits:
//!
//! - Volatile access to a pre-mapped GPIO register block
//! - GPIO number validation
//!
//! Mapping the block (via `/dev/gpiomem`, `/dev/mem` or `ioremap`) is the
//! owner's job; this crate never maps or unmaps anything.

#![no_std]

pub mod mmio;
pub mod pins;

// Re-export shared traits from fdspkr-hal for convenience
pub use fdspkr_hal::RegisterBlock;
pub use mmio::{MmioError, MmioRegisters, GPIO_BLOCK_SIZE};
pub use pins::{parse_pin, validate_pin, PinError, GPIO_COUNT};
