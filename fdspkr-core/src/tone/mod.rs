//! Tone generation
//!
//! Converts requested frequencies into pulse intervals and drives the
//! self-rescheduling pulse callback.

pub mod engine;
pub mod interval;
pub mod scheduler;

pub use engine::ToneEngine;
pub use interval::{FrequencyBounds, ToneInterval, TICK_RATE, TICK_SHIFT};
pub use scheduler::{ToneScheduler, ToneState};
