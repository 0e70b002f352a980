//! Tone engine
//!
//! Owns the actuator, the scheduler and the timer, and is the single
//! driver context every operation goes through. The timer facility calls
//! [`ToneEngine::on_timer`] when a deadline passes; everything else is
//! called by the driver's owner.
//!
//! Callers must serialize access (the engine takes `&mut self`). With that
//! in place, cancelling the timer inside `request_tone`/`stop` is a
//! barrier: no stale pulse can land after either returns.

use embedded_hal::delay::DelayNs;
use fdspkr_hal::{RegisterBlock, ToneTimer};

use super::interval::{FrequencyBounds, ToneInterval};
use super::scheduler::{ToneScheduler, ToneState};
use crate::actuator::{Actuator, Direction};
use crate::config::SpeakerConfig;
use crate::error::Error;
use crate::gpio::Gpio;
use crate::input::{SoundInput, ToneRequest};

/// Driver context: actuator + scheduler + timer
pub struct ToneEngine<R, D, T> {
    actuator: Actuator<R, D>,
    scheduler: ToneScheduler,
    timer: T,
    bell_hz: u32,
    /// Clients currently attached through [`SoundInput::open`]
    users: u32,
    parked: bool,
}

impl<R, D, T> ToneEngine<R, D, T>
where
    R: RegisterBlock,
    D: DelayNs,
    T: ToneTimer,
{
    /// Bring the speaker up
    ///
    /// Validates the configuration, takes the register block, switches the
    /// lines to output and runs the calibration sequence. The engine starts
    /// idle.
    pub fn new(regs: R, delay: D, timer: T, config: &SpeakerConfig) -> Result<Self, Error> {
        config.validate()?;

        let gpio = Gpio::new(regs, config.pins)?;
        let mut actuator = Actuator::new(gpio, delay, config.calibration);
        actuator.calibrate();

        Ok(Self {
            actuator,
            scheduler: ToneScheduler::new(FrequencyBounds::from(&config.tone)),
            timer,
            bell_hz: config.tone.bell_hz,
            users: 0,
            parked: false,
        })
    }

    /// Play `frequency_hz`, replacing any tone in progress
    ///
    /// Out-of-range frequencies silence the speaker and return `Ok`. If the
    /// timer cannot be armed the engine is left idle and the failure is
    /// returned.
    pub fn request_tone(&mut self, frequency_hz: u32) -> Result<(), Error> {
        self.timer.cancel();
        self.scheduler.stop();

        let now = self.timer.now();
        if let Some(deadline) = self.scheduler.start(frequency_hz, now) {
            self.parked = false;
            if let Err(e) = self.timer.arm(deadline) {
                self.scheduler.stop();
                return Err(Error::TimerScheduling(e));
            }
        }

        Ok(())
    }

    /// Silence the speaker
    ///
    /// No-op when idle.
    pub fn stop(&mut self) {
        if self.scheduler.state().is_playing() || self.timer.is_armed() {
            self.timer.cancel();
            self.scheduler.stop();
        }
    }

    /// Timer callback: emit one pulse and re-arm for the next
    ///
    /// The next deadline is the previous deadline plus one interval. Does
    /// nothing if the engine went idle in the meantime.
    pub fn on_timer(&mut self) -> Result<(), Error> {
        if !self.scheduler.state().is_playing() {
            return Ok(());
        }

        self.actuator.pulse();

        if let Some(next) = self.scheduler.advance() {
            if let Err(e) = self.timer.arm(next) {
                self.scheduler.stop();
                return Err(Error::TimerScheduling(e));
            }
        }

        Ok(())
    }

    /// Handle a raw input event
    pub fn handle_event(&mut self, kind: u16, code: u16, value: i32) -> Result<(), Error> {
        let request = ToneRequest::from_event(kind, code, value)?;
        self.request_tone(request.frequency_hz(self.bell_hz))
    }

    /// Stop the tone and leave the lines low
    ///
    /// Idempotent. A later `request_tone` starts playing again.
    pub fn shutdown(&mut self) {
        if self.parked {
            return;
        }
        self.stop();
        self.actuator.park();
        self.parked = true;
    }

    /// Shut down and give the register block back to its owner
    pub fn release(mut self) -> R {
        self.shutdown();
        self.actuator.release()
    }

    /// Current scheduler state
    pub fn state(&self) -> ToneState {
        self.scheduler.state()
    }

    /// Check if a tone is playing
    pub fn is_playing(&self) -> bool {
        self.scheduler.state().is_playing()
    }

    /// Frequency being played
    pub fn frequency_hz(&self) -> Option<u32> {
        self.scheduler.frequency_hz()
    }

    /// Current pulse interval
    pub fn interval(&self) -> Option<ToneInterval> {
        self.scheduler.interval()
    }

    /// Direction the next pulse will travel
    pub fn direction(&self) -> Direction {
        self.actuator.direction()
    }

    /// Number of attached clients
    pub fn users(&self) -> u32 {
        self.users
    }

    /// The timer facility
    pub fn timer(&self) -> &T {
        &self.timer
    }
}

impl<R, D, T> SoundInput for ToneEngine<R, D, T>
where
    R: RegisterBlock,
    D: DelayNs,
    T: ToneTimer,
{
    fn open(&mut self) {
        self.users = self.users.saturating_add(1);
    }

    fn close(&mut self) {
        self.users = self.users.saturating_sub(1);
    }

    fn event(&mut self, kind: u16, code: u16, value: i32) -> Result<(), Error> {
        self.handle_event(kind, code, value)
    }
}
