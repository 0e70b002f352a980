//! Floppy Disk Speaker Hardware Abstraction Layer
//!
//! This crate defines the two hardware seams the tone core is written
//! against. Chip- and OS-specific crates implement them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fdspkr-host (runtime, driver context)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fdspkr-core (gpio, actuator, tone)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fdspkr-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          ┌─────────────────────┐
//!          │ fdspkr-hal-bcm2835  │
//!          └─────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`registers::RegisterBlock`] - 32-bit access to a mapped register region
//! - [`timer::ToneTimer`] - Monotonic one-shot timer that drives the tone callback

#![no_std]
#![deny(unsafe_code)]

pub mod registers;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use registers::RegisterBlock;
pub use timer::{Instant, TimerError, ToneTimer, TICKS_PER_SECOND};
