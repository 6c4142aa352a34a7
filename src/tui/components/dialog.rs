//! # Dialog Component
//!
//! Centered modal for the engine's error dialogs. The selection lives in the
//! engine's [`Dialog`]; this only draws it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::dialog::{Dialog, DialogKind};
use crate::tui::component::Component;

pub struct DialogBox<'a> {
    pub dialog: &'a Dialog,
}

impl<'a> DialogBox<'a> {
    pub fn new(dialog: &'a Dialog) -> Self {
        Self { dialog }
    }
}

impl Component for DialogBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 40, area);
        frame.render_widget(Clear, overlay);

        let accent = match self.dialog.kind {
            DialogKind::DataError => Color::Red,
            DialogKind::UpdateRequired => Color::Yellow,
        };

        let buttons: Vec<Span> = self
            .dialog
            .buttons
            .iter()
            .enumerate()
            .flat_map(|(i, button)| {
                let style = if i == self.dialog.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                [
                    Span::raw("  "),
                    Span::styled(format!(" {} ", button.label()), style),
                ]
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(format!(" {} ", self.dialog.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(buttons).centered())
            .padding(Padding::uniform(1));

        let message = Paragraph::new(self.dialog.message.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, overlay);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
