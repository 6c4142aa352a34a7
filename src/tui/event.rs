use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;

use crate::core::action::Action;
use crate::core::screen::ScreenInput;

/// Remote-control style input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    // D-pad + OK, passed to the engine as screen input
    Up,
    Down,
    Left,
    Right,
    Select,
    // Back/Menu button
    Back,

    // TUI-local events (handled directly in TUI)
    Quit,
    Resize,
}

impl TuiEvent {
    /// The engine action for this event, if it has one.
    pub fn action(self) -> Option<Action> {
        let input = match self {
            TuiEvent::Up => ScreenInput::Up,
            TuiEvent::Down => ScreenInput::Down,
            TuiEvent::Left => ScreenInput::Left,
            TuiEvent::Right => ScreenInput::Right,
            TuiEvent::Select => ScreenInput::Select,
            TuiEvent::Back => return Some(Action::Back),
            TuiEvent::Quit | TuiEvent::Resize => return None,
        };
        Some(Action::Input(input))
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    let ready = match event::poll(timeout) {
        Ok(ready) => ready,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    };
    if !ready {
        return None;
    }
    match event::read() {
        Ok(Event::Key(key_event)) => map_key(key_event),
        Ok(Event::Resize(_, _)) => Some(TuiEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
        (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Up) => Some(TuiEvent::Up),
        (_, KeyCode::Down) => Some(TuiEvent::Down),
        (_, KeyCode::Left) => Some(TuiEvent::Left),
        (_, KeyCode::Right) => Some(TuiEvent::Right),
        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) => Some(TuiEvent::Select),
        (_, KeyCode::Esc) | (_, KeyCode::Backspace) => Some(TuiEvent::Back),
        _ => None,
    }
}
