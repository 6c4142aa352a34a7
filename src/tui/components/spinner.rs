//! Loading spinner, drawn in the middle of the screen while the loading
//! overlay is visible and dimmed while it fades out.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Clear, Paragraph};

use crate::tui::component::Component;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const WIDTH: u16 = 14;

pub struct Spinner {
    pub frame: usize,
    pub fading: bool,
}

impl Spinner {
    pub fn glyph(&self) -> &'static str {
        FRAMES[self.frame % FRAMES.len()]
    }
}

impl Component for Spinner {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width < WIDTH || area.height == 0 {
            return;
        }
        let spot = Rect {
            x: area.x + (area.width - WIDTH) / 2,
            y: area.y + area.height / 2,
            width: WIDTH,
            height: 1,
        };
        let style = if self.fading {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::White)
        };
        frame.render_widget(Clear, spot);
        frame.render_widget(
            Paragraph::new(format!("{} Loading", self.glyph()))
                .style(style)
                .alignment(Alignment::Center),
            spot,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_glyph_cycles() {
        assert_eq!(Spinner { frame: 0, fading: false }.glyph(), "⠋");
        assert_eq!(Spinner { frame: 10, fading: false }.glyph(), "⠋");
        assert_eq!(Spinner { frame: 3, fading: true }.glyph(), "⠸");
    }

    #[test]
    fn test_renders_centered() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Spinner { frame: 1, fading: false }.render(f, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..40u16).map(|x| buffer[(x, 2u16)].symbol()).collect();
        assert!(row.contains("⠙ Loading"), "{:?}", row);
    }

    #[test]
    fn test_too_narrow_draws_nothing() {
        let backend = TestBackend::new(8, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| Spinner { frame: 0, fading: false }.render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(!text.contains("Loading"));
    }
}
