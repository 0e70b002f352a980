//! Speaker driver context
//!
//! Owns the tone engine behind a mutex shared with the timer's dispatch
//! thread. Lock order is always engine, then timer slot: the dispatcher
//! takes the engine lock before claiming an expiry, and `request_tone` /
//! `stop` cancel the timer while holding the engine lock. Either call
//! returning therefore guarantees no pulse from the previous tone follows.

use std::ptr::NonNull;
use std::sync::Arc;
use std::thread::JoinHandle;

use fdspkr_core::input::DeviceInfo;
use fdspkr_core::{SoundInput, SpeakerConfig, ToneEngine, ToneInterval};
use fdspkr_hal::RegisterBlock;
use fdspkr_hal_bcm2835::{validate_pin, MmioRegisters};
use log::{debug, error, info, trace};
use parking_lot::Mutex;

use crate::delay::SpinDelay;
use crate::error::Error;
use crate::timer::ThreadTimer;

type Engine<R> = ToneEngine<R, SpinDelay, ThreadTimer>;

/// Floppy Disk Speaker
///
/// Created with [`Speaker::new`], which calibrates the actuator and starts
/// the timer's dispatch thread. Dropping the speaker stops the tone, parks
/// the lines low and joins the thread; [`Speaker::shutdown`] does the same
/// and also returns the register block.
pub struct Speaker<R: RegisterBlock + Send + 'static> {
    engine: Arc<Mutex<Engine<R>>>,
    timer: ThreadTimer,
    dispatcher: Option<JoinHandle<()>>,
    info: DeviceInfo,
}

impl<R: RegisterBlock + Send + 'static> Speaker<R> {
    /// Bring the speaker up on `regs`
    ///
    /// Validates the pins for this SoC, calibrates the actuator and starts
    /// the dispatch thread. On failure nothing is left running.
    pub fn new(regs: R, config: &SpeakerConfig) -> Result<Self, Error> {
        for pin in [config.pins.direction, config.pins.step] {
            validate_pin(pin).map_err(|reason| Error::Pin { pin, reason })?;
        }

        let timer = ThreadTimer::new();
        let engine = ToneEngine::new(regs, SpinDelay::new(), timer.clone(), config)?;
        let engine = Arc::new(Mutex::new(engine));

        let dispatcher = {
            let engine = Arc::clone(&engine);
            timer.spawn_dispatcher("fdspkr-timer", move |expiry| {
                let mut engine = engine.lock();
                if !engine.timer().claim(expiry) {
                    return;
                }
                if let Err(e) = engine.on_timer() {
                    error!("failed to schedule next pulse: {}", e);
                }
            })
        };

        let dispatcher = match dispatcher {
            Ok(handle) => handle,
            Err(e) => {
                engine.lock().shutdown();
                timer.shutdown();
                return Err(Error::Spawn(e));
            }
        };

        info!(
            "FD Speaker init (DIR=GPIO{} STEP=GPIO{})",
            config.pins.direction, config.pins.step
        );

        Ok(Self {
            engine,
            timer,
            dispatcher: Some(dispatcher),
            info: DeviceInfo::floppy_speaker(),
        })
    }

    /// Play `frequency_hz`, replacing any tone in progress
    ///
    /// Frequencies outside the playable range silence the speaker.
    pub fn request_tone(&self, frequency_hz: u32) -> Result<(), Error> {
        let mut engine = self.engine.lock();
        engine.request_tone(frequency_hz)?;
        if engine.is_playing() {
            debug!("tone {} Hz", frequency_hz);
        } else {
            debug!("tone {} Hz out of range, silenced", frequency_hz);
        }
        Ok(())
    }

    /// Silence the speaker
    pub fn stop(&self) {
        let mut engine = self.engine.lock();
        if engine.is_playing() {
            debug!("tone stopped");
        }
        engine.stop();
    }

    /// Silence the speaker ahead of a system suspend
    ///
    /// The speaker stays up; tones can be requested again on resume.
    pub fn suspend(&self) {
        debug!("suspend");
        self.stop();
    }

    /// Check if a tone is playing
    pub fn is_playing(&self) -> bool {
        self.engine.lock().is_playing()
    }

    /// Frequency being played
    pub fn frequency_hz(&self) -> Option<u32> {
        self.engine.lock().frequency_hz()
    }

    /// Current pulse interval
    pub fn interval(&self) -> Option<ToneInterval> {
        self.engine.lock().interval()
    }

    /// Number of attached input clients
    pub fn users(&self) -> u32 {
        self.engine.lock().users()
    }

    /// Identity registered with the input subsystem
    pub fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Stop the tone, park the lines and return the register block
    pub fn shutdown(mut self) -> Result<R, Error> {
        self.teardown();

        let engine = Arc::clone(&self.engine);
        drop(self);

        match Arc::try_unwrap(engine) {
            Ok(engine) => Ok(engine.into_inner().release()),
            Err(_) => Err(Error::StillShared),
        }
    }

    fn teardown(&mut self) {
        let Some(dispatcher) = self.dispatcher.take() else {
            return;
        };

        self.engine.lock().shutdown();
        self.timer.shutdown();
        if dispatcher.join().is_err() {
            error!("timer thread panicked");
        }

        info!("FD Speaker exit");
    }
}

impl Speaker<MmioRegisters> {
    /// Bring the speaker up on a mapped GPIO block
    ///
    /// # Safety
    ///
    /// `base` must point to `len` bytes of mapped GPIO registers that stay
    /// mapped, and are not touched through any other handle, until the
    /// speaker is shut down or dropped.
    pub unsafe fn from_mapped(
        base: NonNull<u32>,
        len: usize,
        config: &SpeakerConfig,
    ) -> Result<Self, Error> {
        let regs = unsafe { MmioRegisters::new(base, len) }.map_err(Error::Mapping)?;
        Self::new(regs, config)
    }
}

impl<R: RegisterBlock + Send + 'static> SoundInput for Speaker<R> {
    fn open(&mut self) {
        let mut engine = self.engine.lock();
        engine.open();
        debug!("open ({} users)", engine.users());
    }

    fn close(&mut self) {
        let mut engine = self.engine.lock();
        engine.close();
        debug!("close ({} users)", engine.users());
    }

    fn event(&mut self, kind: u16, code: u16, value: i32) -> Result<(), fdspkr_core::Error> {
        let result = self.engine.lock().event(kind, code, value);
        if let Err(e) = &result {
            trace!("rejected event: {}", e);
        }
        result
    }
}

impl<R: RegisterBlock + Send + 'static> Drop for Speaker<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
