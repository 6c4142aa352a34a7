//! # TitleBar Component
//!
//! Top line: app name, the stack as a breadcrumb, and a status note.
//!
//! ```text
//! Crex | Menu › PosterList › Video | Loading...
//! ```
//!
//! Purely presentational. Narrow terminals cut the breadcrumb from the left
//! so the current screen and the status stay visible.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = " › ";

pub struct TitleBar {
    /// Template names, root first.
    pub breadcrumb: Vec<String>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(breadcrumb: Vec<String>, status_message: String) -> Self {
        Self {
            breadcrumb,
            status_message,
        }
    }

    fn text(&self, width: usize) -> String {
        let suffix = if self.status_message.is_empty() {
            String::new()
        } else {
            format!(" | {}", self.status_message)
        };

        let mut crumbs: &[String] = &self.breadcrumb;
        loop {
            let mut text = String::from("Crex");
            if !crumbs.is_empty() {
                text.push_str(" | ");
                if crumbs.len() < self.breadcrumb.len() {
                    text.push('…');
                    text.push_str(SEPARATOR);
                }
                text.push_str(&crumbs.join(SEPARATOR));
            }
            text.push_str(&suffix);
            if text.width() <= width || crumbs.len() <= 1 {
                return text;
            }
            crumbs = &crumbs[1..];
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = self.text(area.width as usize);
        frame.render_widget(Span::raw(text), area);
    }
}
