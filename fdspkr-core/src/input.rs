//! Tone request adapter
//!
//! The host input subsystem delivers raw `(type, code, value)` events from
//! any client. Only SOUND events with a BELL or TONE code mean anything to
//! the speaker; everything else is rejected without touching the tone.

use bitflags::bitflags;
use heapless::String;

use crate::error::Error;

/// Event types (`EV_*`)
pub mod ev {
    /// Synchronization marker
    pub const EV_SYN: u16 = 0x00;
    /// Keys and buttons
    pub const EV_KEY: u16 = 0x01;
    /// Sound output
    pub const EV_SND: u16 = 0x12;
}

/// Sound event codes (`SND_*`)
pub mod snd {
    /// Key click
    pub const SND_CLICK: u16 = 0x00;
    /// Terminal bell
    pub const SND_BELL: u16 = 0x01;
    /// Tone at `value` Hz
    pub const SND_TONE: u16 = 0x02;
}

/// Bus type reported for an on-board device
pub const BUS_HOST: u16 = 0x19;

/// Maximum length of device name/phys strings
pub const MAX_NAME_LEN: usize = 32;

bitflags! {
    /// Event types a device can emit or accept
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventTypes: u32 {
        const SYN = 1 << ev::EV_SYN;
        const KEY = 1 << ev::EV_KEY;
        const SND = 1 << ev::EV_SND;
    }
}

bitflags! {
    /// Sound codes a device accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SoundCodes: u8 {
        const CLICK = 1 << snd::SND_CLICK;
        const BELL = 1 << snd::SND_BELL;
        const TONE = 1 << snd::SND_TONE;
    }
}

/// Input device identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputId {
    /// Bus the device sits on (`BUS_*`)
    pub bustype: u16,
    /// Vendor ID
    pub vendor: u16,
    /// Product ID
    pub product: u16,
    /// Hardware/driver version
    pub version: u16,
}

/// What the speaker registers with the host input subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable device name
    pub name: String<MAX_NAME_LEN>,
    /// Physical path
    pub phys: String<MAX_NAME_LEN>,
    /// Device identifier
    pub id: InputId,
    /// Accepted event types
    pub evbit: EventTypes,
    /// Accepted sound codes
    pub sndbit: SoundCodes,
}

impl DeviceInfo {
    /// Identity of the floppy disk speaker
    pub fn floppy_speaker() -> Self {
        let mut name = String::new();
        let _ = name.push_str("Floppy Disk Speaker");
        let mut phys = String::new();
        let _ = phys.push_str("fdspkr/input0");

        Self {
            name,
            phys,
            id: InputId {
                bustype: BUS_HOST,
                vendor: 0x001f,
                product: 0x0001,
                version: 0x0100,
            },
            evbit: EventTypes::SND,
            sndbit: SoundCodes::BELL | SoundCodes::TONE,
        }
    }

    /// Check whether the device accepts `(kind, code)`
    pub fn supports(&self, kind: u16, code: u16) -> bool {
        let kind_ok = kind < 32 && self.evbit.bits() & (1 << kind) != 0;
        let code_ok = code < 8 && self.sndbit.bits() & (1 << code) != 0;
        kind == ev::EV_SND && kind_ok && code_ok
    }
}

/// Kind of tone request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneKind {
    /// Terminal bell: fixed pitch, value only says on/off
    Bell,
    /// Explicit pitch in Hz
    Tone,
}

/// A validated tone request, consumed by the call that handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneRequest {
    /// Bell or explicit tone
    pub kind: ToneKind,
    /// Raw event value: on/off for a bell, Hz for a tone
    pub value: i32,
}

impl ToneRequest {
    /// Validate a raw input event
    pub fn from_event(kind: u16, code: u16, value: i32) -> Result<Self, Error> {
        if kind != ev::EV_SND {
            return Err(Error::UnsupportedEvent { kind, code });
        }

        let tone_kind = match code {
            snd::SND_BELL => ToneKind::Bell,
            snd::SND_TONE => ToneKind::Tone,
            _ => return Err(Error::UnsupportedEvent { kind, code }),
        };

        Ok(Self {
            kind: tone_kind,
            value,
        })
    }

    /// Frequency to play
    ///
    /// A non-zero bell plays `bell_hz` whatever its value; a zero bell and
    /// every tone pass the value through. Negative values map to 0, which
    /// is below any playable range and so silences the speaker.
    pub fn frequency_hz(&self, bell_hz: u32) -> u32 {
        match self.kind {
            ToneKind::Bell if self.value != 0 => bell_hz,
            _ => u32::try_from(self.value).unwrap_or(0),
        }
    }
}

/// Entry points the host input subsystem calls
pub trait SoundInput {
    /// A client attached to the device
    fn open(&mut self);

    /// A client detached from the device
    fn close(&mut self);

    /// Handle one `(type, code, value)` event
    ///
    /// Unsupported events are rejected with [`Error::UnsupportedEvent`] and
    /// change nothing. Out-of-range frequencies are not an error: they
    /// silence the speaker and return `Ok`.
    fn event(&mut self, kind: u16, code: u16, value: i32) -> Result<(), Error>;
}
