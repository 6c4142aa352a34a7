//! # ScreenView Component
//!
//! Draws the top screen's [`ScreenView`] snapshot. One arrangement per
//! [`ViewLayout`]:
//!
//! ```text
//! MenuBar                      List                          Media
//! ┌──────────────────────┐     ┌ Shows ──────┬────────────┐  ┌──────────────────┐
//! │  [image: bg.jpg]     │     │ ▶ Pilot     │ 2019 · 42m │  │    Now Playing   │
//! │                      │     │   Finale    │ Where it…  │  │ http://cdn/x.m3u8│
//! │ Movies  Shows  Kids  │     │             │            │  │                  │
//! └──────────────────────┘     └─────────────┴────────────┘  └──────────────────┘
//! ```
//!
//! Images are shown as their URL; the terminal is not a picture frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::core::screen::{ScreenView, ViewLayout};
use crate::tui::component::Component;
use crate::tui::theme::Theme;

const MENU_BAR_HEIGHT: u16 = 3;

pub struct ScreenViewWidget<'a> {
    pub view: ScreenView,
    pub theme: &'a Theme,
}

impl<'a> ScreenViewWidget<'a> {
    pub fn new(view: ScreenView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let [backdrop, bar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(MENU_BAR_HEIGHT)]).areas(area);

        render_background(frame, backdrop, self.view.background.as_deref());

        let mut spans = Vec::new();
        for (i, title) in self.view.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            let style = if self.view.focused == Some(i) {
                Style::default()
                    .fg(self.theme.focused_text)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(self.theme.unfocused_text)
            };
            spans.push(Span::styled(format!(" {} ", title), style));
        }

        let menu = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .style(Style::default().bg(self.theme.menu_background))
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(menu, bar);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(
            self.view
                .title
                .as_deref()
                .map(|t| format!(" {} ", t))
                .unwrap_or_default(),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(inner);

        let items: Vec<ListItem> = self
            .view
            .items
            .iter()
            .map(|title| ListItem::new(title.as_str()))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(self.theme.unfocused_text))
            .highlight_style(
                Style::default()
                    .fg(self.theme.focused_text)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(self.view.focused);
        frame.render_stateful_widget(list, list_area, &mut state);

        let mut lines: Vec<Line> = self
            .view
            .details
            .iter()
            .map(|d| Line::from(d.as_str()))
            .collect();
        if let Some(background) = &self.view.background {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("Background: {}", background),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let details = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::LEFT));
        frame.render_widget(details, detail_area);
    }

    fn render_media(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        if let Some(title) = &self.view.title {
            lines.push(Line::styled(
                title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        for detail in &self.view.details {
            lines.push(Line::from(detail.as_str()));
        }
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            middle,
        );
    }
}

fn render_background(frame: &mut Frame, area: Rect, url: Option<&str>) {
    let Some(url) = url else {
        return;
    };
    let text = Paragraph::new(format!("[image: {}]", url))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    let [_, line, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(text, line);
}

impl Component for ScreenViewWidget<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.view.layout {
            ViewLayout::MenuBar => self.render_menu_bar(frame, area),
            ViewLayout::List => self.render_list(frame, area),
            ViewLayout::Media => self.render_media(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(view: ScreenView) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                ScreenViewWidget::new(view.clone(), &theme).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_menu_bar_shows_buttons_and_background() {
        let text = draw(ScreenView {
            layout: ViewLayout::MenuBar,
            background: Some("bg.jpg".into()),
            items: vec!["Movies".into(), "Shows".into()],
            focused: Some(1),
            ..Default::default()
        });
        assert!(text.contains("Movies"));
        assert!(text.contains("Shows"));
        assert!(text.contains("[image: bg.jpg]"));
    }

    #[test]
    fn test_list_highlights_focus_and_details() {
        let text = draw(ScreenView {
            layout: ViewLayout::List,
            title: Some("Shows".into()),
            items: vec!["Pilot".into(), "Finale".into()],
            focused: Some(1),
            details: vec!["58 min".into()],
            ..Default::default()
        });
        assert!(text.contains("Shows"));
        assert!(text.contains("▶ Finale"));
        assert!(text.contains("58 min"));
    }

    #[test]
    fn test_media_centers_details() {
        let text = draw(ScreenView {
            layout: ViewLayout::Media,
            title: Some("Now Playing".into()),
            details: vec!["http://cdn/x.m3u8".into()],
            ..Default::default()
        });
        assert!(text.contains("Now Playing"));
        assert!(text.contains("http://cdn/x.m3u8"));
    }
}
