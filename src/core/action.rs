//! # Actions and Effects
//!
//! Everything that can happen to the engine becomes an `Action`.
//! The remote's Back button? That's `Action::Back`.
//! A fetch came back? That's `Action::FetchCompleted { .. }`.
//!
//! The engine answers each action with a list of `Effect`s: work it wants
//! done outside of itself (fetch this, wake me up in 250 ms, quit). The
//! runtime performs the effects and reports back with more actions.
//!
//! ```text
//! Engine + Action  →  update()  →  Engine' + [Effect]
//!                                        │
//!                      runtime ◀─────────┘
//!                         │ (tokio tasks)
//!                         └──────▶ Action ──▶ channel ──▶ UI loop
//! ```
//!
//! Nothing in here touches the network or a clock, so every navigation
//! scenario can be replayed action by action in a unit test.

use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::core::dialog::DialogButton;
use crate::core::document::CrexAction;
use crate::core::screen::{ContentSource, ScreenInput};
use crate::core::stack::ScreenId;
use crate::fetch::FetchError;

/// Identifies one navigation attempt. Completions carry it back so late
/// results of abandoned attempts can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(pub u64);

/// Who asked for a content load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    /// The screen being built by a navigation attempt.
    Pending(AttemptId),
    /// A committed screen refreshing its content on re-entry.
    Refresh(ScreenId),
}

/// Timers the engine arms. The payload is the generation the timer was
/// armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    SpinnerDelay(u64),
    SpinnerFade(u64),
    Transition(u64),
}

#[derive(Debug)]
pub enum Action {
    /// Load the configured root screen.
    Start,
    NavigateToUrl(String),
    Navigate(CrexAction),
    /// Remote Back/Menu button.
    Back,
    Input(ScreenInput),
    DialogResponse(DialogButton),
    FetchCompleted {
        attempt: AttemptId,
        result: Result<Value, FetchError>,
    },
    ContentLoaded {
        target: LoadTarget,
        result: Result<Value, FetchError>,
    },
    TimerFired(Timer),
}

#[derive(Debug)]
pub enum Effect {
    /// GET `url` (possibly relative to the root) and report `FetchCompleted`.
    Fetch {
        attempt: AttemptId,
        url: String,
        cancel: CancellationToken,
    },
    /// Produce the document for `source` and report `ContentLoaded`.
    LoadContent {
        target: LoadTarget,
        source: ContentSource,
        cancel: CancellationToken,
    },
    /// Report `TimerFired(timer)` after `after`.
    Schedule { timer: Timer, after: Duration },
    Exit,
}
