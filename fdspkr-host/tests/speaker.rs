//! Speaker lifecycle against a real dispatch thread
//!
//! The register block is ordinary memory shared with the test, so the test
//! can watch the traffic while the speaker runs.

use std::ptr::NonNull;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fdspkr_core::config::PinConfig;
use fdspkr_core::gpio::reg;
use fdspkr_core::input::{ev, snd};
use fdspkr_core::{ConfigError, Error as CoreError};
use fdspkr_hal::RegisterBlock;
use fdspkr_hal_bcm2835::{MmioRegisters, PinError, GPIO_BLOCK_SIZE};
use fdspkr_host::{Error, SoundInput, Speaker, SpeakerConfig};
use parking_lot::Mutex;

const DIR: u32 = 1 << 23;
const STEP: u32 = 1 << 24;

struct Bank {
    words: [u32; GPIO_BLOCK_SIZE / 4],
    writes: Vec<(usize, u32)>,
}

impl Default for Bank {
    fn default() -> Self {
        Self {
            words: [0; GPIO_BLOCK_SIZE / 4],
            writes: Vec::new(),
        }
    }
}

/// In-memory GPIO block; SET/CLR writes update the level register
#[derive(Clone, Default)]
struct SharedRegs(Arc<Mutex<Bank>>);

impl SharedRegs {
    fn write_count(&self) -> usize {
        self.0.lock().writes.len()
    }

    fn step_pulses(&self) -> usize {
        self.0
            .lock()
            .writes
            .iter()
            .filter(|&&(offset, value)| offset == reg::GPSET0 && value == STEP)
            .count()
    }

    fn level(&self) -> u32 {
        self.0.lock().words[reg::GPLEV0 / 4]
    }

    /// DIR level at each STEP rising edge
    fn dir_at_steps(&self) -> Vec<bool> {
        let bank = self.0.lock();
        let mut dir = false;
        let mut out = Vec::new();
        for &(offset, value) in &bank.writes {
            match (offset, value) {
                (reg::GPSET0, DIR) => dir = true,
                (reg::GPCLR0, DIR) => dir = false,
                (reg::GPSET0, STEP) => out.push(dir),
                _ => {}
            }
        }
        out
    }
}

impl RegisterBlock for SharedRegs {
    fn read(&self, offset: usize) -> u32 {
        self.0.lock().words[offset / 4]
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut bank = self.0.lock();
        bank.writes.push((offset, value));
        match offset {
            reg::GPSET0 => bank.words[reg::GPLEV0 / 4] |= value,
            reg::GPCLR0 => bank.words[reg::GPLEV0 / 4] &= !value,
            _ => bank.words[offset / 4] = value,
        }
    }

    fn size(&self) -> usize {
        GPIO_BLOCK_SIZE
    }
}

fn speaker() -> (Speaker<SharedRegs>, SharedRegs) {
    let regs = SharedRegs::default();
    let speaker = Speaker::new(regs.clone(), &SpeakerConfig::default()).unwrap();
    (speaker, regs)
}

#[test]
fn test_init_calibrates_and_idles() {
    let (speaker, regs) = speaker();

    // 4 seek + 2 backoff steps
    assert_eq!(regs.step_pulses(), 6);
    assert_eq!(regs.level() & (DIR | STEP), DIR);
    assert!(!speaker.is_playing());

    // Both lines configured as outputs in GPFSEL2
    let fsel2 = regs.0.lock().words[2];
    assert_eq!((fsel2 >> 9) & 0b111, 0b001);
    assert_eq!((fsel2 >> 12) & 0b111, 0b001);

    let before = regs.write_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(regs.write_count(), before);
}

#[test]
fn test_tone_produces_pulses() {
    let (speaker, regs) = speaker();
    let calibration = regs.step_pulses();

    speaker.request_tone(1000).unwrap();
    assert!(speaker.is_playing());
    assert_eq!(speaker.frequency_hz(), Some(1000));
    assert_eq!(speaker.interval().map(|i| i.as_ticks()), Some(4_751_360));

    thread::sleep(Duration::from_millis(100));
    speaker.stop();

    // ~21 pulses at 4.75 ms; leave room for a slow scheduler
    let pulses = regs.step_pulses() - calibration;
    assert!(pulses >= 5, "only {pulses} pulses in 100 ms");

    // Direction alternates on every pulse
    let dirs = regs.dir_at_steps();
    for pair in dirs[calibration..].windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_stop_is_a_barrier() {
    let (speaker, regs) = speaker();

    for _ in 0..5 {
        speaker.request_tone(1000).unwrap();
        thread::sleep(Duration::from_millis(15));
        speaker.stop();
        assert!(!speaker.is_playing());

        let after_stop = regs.write_count();
        thread::sleep(Duration::from_millis(15));
        assert_eq!(regs.write_count(), after_stop);
    }

    // Idempotent
    speaker.stop();
    speaker.stop();
    assert!(!speaker.is_playing());
}

#[test]
fn test_rapid_requests() {
    let (speaker, regs) = speaker();

    for i in 0..200u32 {
        speaker.request_tone(100 + (i * 37) % 900).unwrap();
    }
    assert!(speaker.is_playing());
    assert_eq!(speaker.frequency_hz(), Some(100 + (199 * 37) % 900));

    speaker.request_tone(0).unwrap();
    assert!(!speaker.is_playing());

    let after_stop = regs.write_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(regs.write_count(), after_stop);
}

#[test]
fn test_out_of_range_silences() {
    let (speaker, regs) = speaker();

    speaker.request_tone(440).unwrap();
    for hz in [0, 20, 50, 1050, 20_000] {
        speaker.request_tone(hz).unwrap();
        assert!(!speaker.is_playing());
        assert_eq!(speaker.frequency_hz(), None);
    }

    let after = regs.write_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(regs.write_count(), after);
}

#[test]
fn test_sound_events() {
    let (mut speaker, _regs) = speaker();

    speaker.event(ev::EV_SND, snd::SND_BELL, 1).unwrap();
    assert_eq!(speaker.frequency_hz(), Some(1000));

    speaker.event(ev::EV_SND, snd::SND_TONE, 440).unwrap();
    assert_eq!(speaker.frequency_hz(), Some(440));

    // Rejected events leave the tone alone
    assert_eq!(
        speaker.event(ev::EV_KEY, 30, 1),
        Err(CoreError::UnsupportedEvent { kind: ev::EV_KEY, code: 30 })
    );
    assert!(speaker.event(ev::EV_SND, snd::SND_CLICK, 1).is_err());
    assert_eq!(speaker.frequency_hz(), Some(440));

    speaker.event(ev::EV_SND, snd::SND_BELL, 0).unwrap();
    assert!(!speaker.is_playing());

    speaker.event(ev::EV_SND, snd::SND_TONE, 300).unwrap();
    speaker.event(ev::EV_SND, snd::SND_TONE, -300).unwrap();
    assert!(!speaker.is_playing());
}

#[test]
fn test_open_close_and_identity() {
    let (mut speaker, _regs) = speaker();

    speaker.open();
    speaker.open();
    assert_eq!(speaker.users(), 2);
    speaker.close();
    speaker.close();
    speaker.close();
    assert_eq!(speaker.users(), 0);

    let info = speaker.device_info();
    assert_eq!(info.name.as_str(), "Floppy Disk Speaker");
    assert!(info.supports(ev::EV_SND, snd::SND_TONE));
    assert_eq!(fdspkr_host::DRIVER_NAME, "fdspkr");
}

#[test]
fn test_suspend_then_resume() {
    let (speaker, regs) = speaker();

    speaker.request_tone(800).unwrap();
    speaker.suspend();
    assert!(!speaker.is_playing());

    let after = regs.write_count();
    thread::sleep(Duration::from_millis(15));
    assert_eq!(regs.write_count(), after);

    speaker.request_tone(800).unwrap();
    thread::sleep(Duration::from_millis(30));
    assert!(regs.write_count() > after);
}

#[test]
fn test_shutdown_parks_and_returns_block() {
    let (speaker, regs) = speaker();
    speaker.request_tone(1000).unwrap();
    thread::sleep(Duration::from_millis(20));

    let returned = speaker.shutdown().unwrap();
    assert!(Arc::ptr_eq(&returned.0, &regs.0));
    assert_eq!(regs.level() & (DIR | STEP), 0);

    let after = regs.write_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(regs.write_count(), after);
}

#[test]
fn test_drop_tears_down() {
    let (speaker, regs) = speaker();
    speaker.request_tone(600).unwrap();
    thread::sleep(Duration::from_millis(10));
    drop(speaker);

    assert_eq!(regs.level() & (DIR | STEP), 0);
    let after = regs.write_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(regs.write_count(), after);
}

#[test]
fn test_rejects_bad_config() {
    let config = SpeakerConfig {
        pins: PinConfig {
            direction: 23,
            step: 60,
        },
        ..SpeakerConfig::default()
    };
    assert!(matches!(
        Speaker::new(SharedRegs::default(), &config),
        Err(Error::Pin {
            pin: 60,
            reason: PinError::InvalidPin
        })
    ));

    let mut config = SpeakerConfig::default();
    config.tone.bell_hz = 20;
    let regs = SharedRegs::default();
    assert!(matches!(
        Speaker::new(regs.clone(), &config),
        Err(Error::Core(CoreError::Configuration(
            ConfigError::BellOutOfRange
        )))
    ));
    assert_eq!(regs.write_count(), 0);
}

#[test]
fn test_mapped_block() {
    let mut words = vec![0u32; GPIO_BLOCK_SIZE / 4];
    let base = NonNull::new(words.as_mut_ptr()).unwrap();

    let speaker =
        unsafe { Speaker::from_mapped(base, GPIO_BLOCK_SIZE, &SpeakerConfig::default()) }
            .unwrap();
    speaker.request_tone(1000).unwrap();
    thread::sleep(Duration::from_millis(20));
    let regs: MmioRegisters = speaker.shutdown().unwrap();
    assert_eq!(regs.base(), base);
    drop(regs);

    assert_eq!((words[2] >> 9) & 0b111, 0b001);
    assert_eq!((words[2] >> 12) & 0b111, 0b001);
    // Parking clears DIR, then STEP
    assert_eq!(words[reg::GPCLR0 / 4], STEP);

    let err = unsafe { Speaker::from_mapped(base, 2, &SpeakerConfig::default()) };
    assert!(matches!(err, Err(Error::Mapping(_))));
}
