//! # Screens
//!
//! A screen is one navigable page: one template instantiated with one piece
//! of server data. The engine only talks to screens through [`Screen`];
//! how a screen is drawn is the platform adapter's business. Screens hand the
//! adapter a [`ScreenView`] snapshot, which is all the TUI needs.
//!
//! Content loading is split in two halves so that nothing running off the UI
//! loop ever touches a screen:
//!
//! ```text
//!   content_source()      →  runtime fetches / passes through (background)
//!   render(&document)     ←  UI loop, after the result came back
//! ```

use serde_json::Value;

use crate::core::document::NavigationRequest;

/// Where a screen's content document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// The action data already is the document.
    Inline(Value),
    /// The document has to be fetched (relative URLs resolve against the root).
    Url(String),
}

impl ContentSource {
    /// The common convention: a JSON string is a URL to fetch, anything else
    /// is the document itself.
    pub fn from_data(data: &Value) -> Self {
        match data {
            Value::String(url) => ContentSource::Url(url.clone()),
            other => ContentSource::Inline(other.clone()),
        }
    }
}

/// Directional + select input, as delivered by a TV remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenInput {
    Up,
    Down,
    Left,
    Right,
    Select,
}

/// The screen could not make sense of its content document.
#[derive(Debug, thiserror::Error)]
#[error("{template} content rejected: {reason}")]
pub struct ContentError {
    pub template: String,
    pub reason: String,
}

impl ContentError {
    pub fn new(template: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            template: template.into(),
            reason: reason.to_string(),
        }
    }
}

/// How the adapter should arrange a [`ScreenView`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewLayout {
    /// Horizontal button bar along the bottom edge.
    MenuBar,
    /// Vertical list with a detail pane for the focused entry.
    #[default]
    List,
    /// A single piece of media filling the screen.
    Media,
}

/// Platform-neutral snapshot of what a screen wants on the display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenView {
    pub layout: ViewLayout,
    pub title: Option<String>,
    /// Best-matching background image URL, if any.
    pub background: Option<String>,
    pub items: Vec<String>,
    pub focused: Option<usize>,
    /// Free text shown next to the focused item.
    pub details: Vec<String>,
}

/// The capability every template implementation provides.
pub trait Screen: Send {
    /// Template name this screen was registered under.
    fn template(&self) -> &str;

    /// Where the content for this screen lives. Called once per load.
    fn content_source(&self) -> ContentSource;

    /// Installs a freshly loaded document. Only called on the UI loop and only
    /// when the document's fingerprint differs from the last rendered one.
    fn render(&mut self, document: &Value) -> Result<(), ContentError>;

    fn view(&self) -> ScreenView;

    /// Reacts to remote input. Returns a navigation request when the user
    /// activated something that leads to another screen.
    fn handle_input(&mut self, _input: ScreenInput) -> Option<NavigationRequest> {
        None
    }

    /// Index of the element holding input focus, if any.
    fn focus(&self) -> Option<usize> {
        None
    }

    fn restore_focus(&mut self, _index: usize) {}

    fn will_show(&mut self) {}
    fn did_show(&mut self) {}
    fn will_hide(&mut self) {}
    fn did_hide(&mut self) {}
}
