//! # Loading Overlay
//!
//! The single global "please wait" state. Short loads should never flash a
//! spinner, so showing is debounced: `start()` only arms a delay timer and
//! the spinner appears when that timer fires while we are still loading.
//! Hiding fades out over the animation time. Work that wants to run once
//! the overlay is gone (error dialogs) is queued and handed back when the
//! fade ends.
//!
//! ```text
//!            start()              delay_elapsed(g)
//!   Idle ──────────────▶ PendingShow ──────────────▶ Visible
//!    ▲                      │ stop()                    │ stop()
//!    │    (callbacks now)   ▼                           ▼
//!    ◀──────────────────── Idle              Cancelling ──fade_finished(g)──▶ Idle
//! ```
//!
//! Timers are never cancelled. Each one carries the generation it was armed
//! with and is ignored if the overlay has moved on since.

use std::time::Duration;

use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    PendingShow,
    Visible,
    Cancelling,
}

/// Returned by [`LoadingOverlay::start`]: arm a delay timer for `generation`.
#[derive(Debug, PartialEq)]
pub struct Started<T> {
    pub generation: u64,
    pub delay: Duration,
    /// Callbacks of an abandoned fade, handed back to the caller.
    pub flushed: Vec<T>,
}

/// Returned by [`LoadingOverlay::stop`].
#[derive(Debug, PartialEq)]
pub enum Stopped<T> {
    /// Nothing was showing; run these callbacks right away.
    Now(Vec<T>),
    /// A fade began. Arm a timer for `generation` after `duration`.
    Fading { generation: u64, duration: Duration },
    /// A fade was already running; the callback was queued behind it.
    AlreadyFading,
}

pub struct LoadingOverlay<T> {
    state: LoadingState,
    generation: u64,
    delay: Duration,
    fade: Duration,
    queued: Vec<T>,
}

impl<T> LoadingOverlay<T> {
    pub fn new(delay: Duration, fade: Duration) -> Self {
        Self {
            state: LoadingState::Idle,
            generation: 0,
            delay,
            fade,
            queued: Vec::new(),
        }
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    /// The spinner is on screen.
    pub fn is_spinning(&self) -> bool {
        self.state == LoadingState::Visible
    }

    /// Callbacks are waiting for a fade to finish.
    pub fn has_pending_callbacks(&self) -> bool {
        !self.queued.is_empty()
    }

    /// Begins a loading period. `None` if one is already running.
    pub fn start(&mut self) -> Option<Started<T>> {
        let flushed = match self.state {
            LoadingState::Idle => Vec::new(),
            LoadingState::Cancelling => {
                debug!("Overlay restarted during fade, abandoning fade");
                std::mem::take(&mut self.queued)
            }
            LoadingState::PendingShow | LoadingState::Visible => {
                warn!("Overlay start while already {:?}", self.state);
                return None;
            }
        };

        self.generation += 1;
        self.state = LoadingState::PendingShow;
        Some(Started {
            generation: self.generation,
            delay: self.delay,
            flushed,
        })
    }

    /// The debounce timer armed by `start()` fired. Returns true if the
    /// spinner is now visible.
    pub fn delay_elapsed(&mut self, generation: u64) -> bool {
        if self.state == LoadingState::PendingShow && generation == self.generation {
            self.state = LoadingState::Visible;
            true
        } else {
            debug!("Ignoring stale spinner delay (gen {})", generation);
            false
        }
    }

    /// Ends the loading period. `callback` runs once the overlay is gone.
    pub fn stop(&mut self, callback: Option<T>) -> Stopped<T> {
        match self.state {
            LoadingState::Idle => Stopped::Now(callback.into_iter().collect()),
            LoadingState::PendingShow => {
                // bump so the armed delay timer goes stale
                self.generation += 1;
                self.state = LoadingState::Idle;
                let mut ready = std::mem::take(&mut self.queued);
                ready.extend(callback);
                Stopped::Now(ready)
            }
            LoadingState::Visible => {
                self.generation += 1;
                self.state = LoadingState::Cancelling;
                self.queued.extend(callback);
                Stopped::Fading {
                    generation: self.generation,
                    duration: self.fade,
                }
            }
            LoadingState::Cancelling => {
                self.queued.extend(callback);
                Stopped::AlreadyFading
            }
        }
    }

    /// The fade timer fired. Returns the queued callbacks if it was current.
    pub fn fade_finished(&mut self, generation: u64) -> Vec<T> {
        if self.state == LoadingState::Cancelling && generation == self.generation {
            self.state = LoadingState::Idle;
            std::mem::take(&mut self.queued)
        } else {
            debug!("Ignoring stale fade end (gen {})", generation);
            Vec::new()
        }
    }
}
