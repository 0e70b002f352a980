//! Thread-backed tone timer
//!
//! A single dispatch thread sleeps on a condition variable until the armed
//! deadline passes, then hands an [`Expiry`] to the owner's callback. Every
//! `arm`/`cancel` bumps a generation counter; the callback must
//! [`claim`](ThreadTimer::claim) the expiry under the same lock that
//! serializes `request_tone`/`stop`, and a claim from an older generation
//! fails. That makes `cancel` a barrier: once the caller holding the
//! owner's lock has cancelled, no expiry from before can be claimed.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant as StdInstant};

use fdspkr_hal::{Instant, TimerError, ToneTimer};
use parking_lot::{Condvar, Mutex};

/// A deadline that came due, pending dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    generation: u64,
    deadline: Instant,
}

impl Expiry {
    /// The deadline that passed
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Debug, Default)]
struct Slot {
    deadline: Option<Instant>,
    generation: u64,
    shutdown: bool,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    wake: Condvar,
    epoch: StdInstant,
}

impl Shared {
    fn now(&self) -> Instant {
        let nanos = self.epoch.elapsed().as_nanos();
        Instant::from_ticks(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Block until the armed deadline passes; `None` once shut down
    fn wait_for_expiry(&self) -> Option<Expiry> {
        let mut slot = self.slot.lock();
        loop {
            if slot.shutdown {
                return None;
            }

            match slot.deadline {
                None => self.wake.wait(&mut slot),
                Some(deadline) => {
                    let now = self.now();
                    if now >= deadline {
                        return Some(Expiry {
                            generation: slot.generation,
                            deadline,
                        });
                    }
                    let _ = self
                        .wake
                        .wait_for(&mut slot, Duration::from_nanos(deadline - now));
                }
            }
        }
    }
}

/// One-shot timer served by a dispatch thread
///
/// Cloning yields another handle to the same timer.
#[derive(Debug, Clone)]
pub struct ThreadTimer {
    shared: Arc<Shared>,
}

impl Default for ThreadTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadTimer {
    /// Create a timer; its clock starts at zero now
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                wake: Condvar::new(),
                epoch: StdInstant::now(),
            }),
        }
    }

    /// Start the dispatch thread
    ///
    /// `on_expiry` runs on the dispatch thread for every deadline that
    /// passes. It should take the owner's lock and then
    /// [`claim`](Self::claim) the expiry before acting on it.
    pub fn spawn_dispatcher<F>(&self, name: &str, mut on_expiry: F) -> io::Result<JoinHandle<()>>
    where
        F: FnMut(Expiry) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        thread::Builder::new().name(name.into()).spawn(move || {
            while let Some(expiry) = shared.wait_for_expiry() {
                on_expiry(expiry);
            }
        })
    }

    /// Consume `expiry` if it is still the armed deadline
    ///
    /// Returns false for an expiry that was cancelled or superseded since
    /// it was observed. A successful claim disarms the timer.
    pub fn claim(&self, expiry: Expiry) -> bool {
        let mut slot = self.shared.slot.lock();
        if slot.shutdown
            || slot.generation != expiry.generation
            || slot.deadline != Some(expiry.deadline)
        {
            return false;
        }
        slot.deadline = None;
        true
    }

    /// Stop the dispatch thread; later `arm` calls fail
    pub fn shutdown(&self) {
        let mut slot = self.shared.slot.lock();
        slot.shutdown = true;
        slot.deadline = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.shared.wake.notify_all();
    }

    /// Check if the timer has been shut down
    pub fn is_shut_down(&self) -> bool {
        self.shared.slot.lock().shutdown
    }
}

impl ToneTimer for ThreadTimer {
    fn now(&self) -> Instant {
        self.shared.now()
    }

    fn arm(&mut self, deadline: Instant) -> Result<(), TimerError> {
        let mut slot = self.shared.slot.lock();
        if slot.shutdown {
            return Err(TimerError::Shutdown);
        }
        slot.deadline = Some(deadline);
        slot.generation = slot.generation.wrapping_add(1);
        self.shared.wake.notify_all();
        Ok(())
    }

    fn cancel(&mut self) {
        let mut slot = self.shared.slot.lock();
        slot.deadline = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.shared.wake.notify_all();
    }

    fn is_armed(&self) -> bool {
        self.shared.slot.lock().deadline.is_some()
    }
}
