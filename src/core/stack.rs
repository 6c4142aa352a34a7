//! # Screen Stack
//!
//! Ordered screens, bottom = root, top = visible. Every push and pop is a
//! transition with a begin and an end; the end arrives later as a timer event
//! once the platform's animation has played. Lifecycle hooks are delivered
//! in this order:
//!
//! ```text
//! push:  outgoing.will_hide  incoming.will_show  ...  outgoing.did_hide  incoming.did_show
//! pop:   leaving.will_hide   revealed.will_show  ...  leaving.did_hide   revealed.did_show
//! ```
//!
//! Screens below the top stay alive (just invisible) so going back is
//! instant. A popped screen is dropped when its pop transition ends.

use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::core::fingerprint::Fingerprint;
use crate::core::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

/// A live screen plus the bookkeeping the engine keeps about it.
pub struct ScreenDescriptor {
    id: ScreenId,
    template: String,
    content_fingerprint: Option<Fingerprint>,
    last_loaded_at: Option<Instant>,
    saved_focus: Option<usize>,
    visible: bool,
    /// Token of an in-flight refresh, cancelled if the screen goes away.
    pub(crate) pending_refresh: Option<CancellationToken>,
    screen: Box<dyn Screen>,
}

impl ScreenDescriptor {
    pub fn new(id: ScreenId, screen: Box<dyn Screen>) -> Self {
        Self {
            id,
            template: screen.template().to_string(),
            content_fingerprint: None,
            last_loaded_at: None,
            saved_focus: None,
            visible: false,
            pending_refresh: None,
            screen,
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn content_fingerprint(&self) -> Option<&Fingerprint> {
        self.content_fingerprint.as_ref()
    }

    pub fn last_loaded_at(&self) -> Option<Instant> {
        self.last_loaded_at
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }

    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        self.screen.as_mut()
    }

    /// Records a completed load. `fingerprint` is `None` when the load failed
    /// and only the timestamp should move.
    pub fn record_load(&mut self, fingerprint: Option<Fingerprint>, at: Instant) {
        if fingerprint.is_some() {
            self.content_fingerprint = fingerprint;
        }
        self.last_loaded_at = Some(at);
    }

    /// True when the content was never loaded or is older than `ttl`.
    pub fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        match self.last_loaded_at {
            Some(at) => now.saturating_duration_since(at) > ttl,
            None => true,
        }
    }

    fn cancel_refresh(&mut self) {
        if let Some(token) = self.pending_refresh.take() {
            token.cancel();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Push,
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    kind: TransitionKind,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("a {0:?} transition is already in progress")]
    TransitionInProgress(TransitionKind),
}

#[derive(Default)]
pub struct ScreenStack {
    screens: Vec<ScreenDescriptor>,
    /// Popped screen waiting for its transition to end.
    leaving: Option<ScreenDescriptor>,
    transition: Option<Transition>,
    next_generation: u64,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn top(&self) -> Option<&ScreenDescriptor> {
        self.screens.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut ScreenDescriptor> {
        self.screens.last_mut()
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut ScreenDescriptor> {
        self.screens.iter_mut().find(|d| d.id == id)
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &ScreenDescriptor> {
        self.screens.iter()
    }

    /// Begins a push transition. Returns the transition generation to hand
    /// back to [`finish_transition`](Self::finish_transition).
    pub fn push(&mut self, mut incoming: ScreenDescriptor) -> Result<u64, StackError> {
        if let Some(transition) = self.transition {
            warn!("Rejected push of {} during {:?}", incoming.template, transition.kind);
            return Err(StackError::TransitionInProgress(transition.kind));
        }

        if let Some(outgoing) = self.screens.last_mut() {
            outgoing.saved_focus = outgoing.screen.focus();
            outgoing.screen.will_hide();
        }
        incoming.screen.will_show();
        incoming.visible = true;

        debug!(
            "Push {} ({:?}), depth {} -> {}",
            incoming.template,
            incoming.id,
            self.screens.len(),
            self.screens.len() + 1
        );
        self.screens.push(incoming);
        Ok(self.begin(TransitionKind::Push))
    }

    /// Begins a pop transition. `Ok(None)` when only the root is left: the
    /// stack never empties, the caller decides whether that means exit.
    pub fn pop(&mut self) -> Result<Option<u64>, StackError> {
        if let Some(transition) = self.transition {
            warn!("Rejected pop during {:?}", transition.kind);
            return Err(StackError::TransitionInProgress(transition.kind));
        }
        if self.screens.len() <= 1 {
            return Ok(None);
        }

        let Some(mut leaving) = self.screens.pop() else {
            return Ok(None);
        };
        leaving.screen.will_hide();

        if let Some(revealed) = self.screens.last_mut() {
            revealed.visible = true;
            if let Some(index) = revealed.saved_focus.take() {
                revealed.screen.restore_focus(index);
            }
            revealed.screen.will_show();
        }

        debug!(
            "Pop {} ({:?}), depth {} -> {}",
            leaving.template,
            leaving.id,
            self.screens.len() + 1,
            self.screens.len()
        );
        self.leaving = Some(leaving);
        Ok(Some(self.begin(TransitionKind::Pop)))
    }

    /// Ends the transition identified by `generation`. Stale or unknown
    /// generations are ignored and return `None`.
    pub fn finish_transition(&mut self, generation: u64) -> Option<TransitionKind> {
        let transition = self.transition.filter(|t| t.generation == generation)?;
        self.transition = None;

        match transition.kind {
            TransitionKind::Push => {
                let depth = self.screens.len();
                if depth >= 2 {
                    let outgoing = &mut self.screens[depth - 2];
                    outgoing.screen.did_hide();
                    outgoing.visible = false;
                }
                if let Some(incoming) = self.screens.last_mut() {
                    incoming.screen.did_show();
                }
            }
            TransitionKind::Pop => {
                if let Some(mut leaving) = self.leaving.take() {
                    leaving.screen.did_hide();
                    leaving.cancel_refresh();
                    debug!("Released {} ({:?})", leaving.template, leaving.id);
                }
                if let Some(revealed) = self.screens.last_mut() {
                    revealed.screen.did_show();
                }
            }
        }
        Some(transition.kind)
    }

    fn begin(&mut self, kind: TransitionKind) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.transition = Some(Transition { kind, generation });
        generation
    }
}
