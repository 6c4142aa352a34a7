use crate::core::engine::{NavigationEngine, NavigationPhase};
use crate::core::overlay::LoadingState;
use crate::tui::component::Component;
use crate::tui::components::{DialogBox, ScreenViewWidget, Spinner, TitleBar};
use crate::tui::theme::Theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

const HELP: &str = "←↑↓→ Move  Enter Select  Esc Back  q Quit";

/// Whether anything on screen is moving and needs a steady frame rate.
pub fn is_animating(engine: &NavigationEngine) -> bool {
    matches!(
        engine.overlay().state(),
        LoadingState::Visible | LoadingState::Cancelling
    )
}

fn status_message(engine: &NavigationEngine) -> String {
    match engine.phase() {
        Some(NavigationPhase::Fetching) => "Loading...".to_string(),
        Some(NavigationPhase::Validating | NavigationPhase::Resolving) => "Preparing...".to_string(),
        Some(NavigationPhase::LoadingScreenContent | NavigationPhase::Committing) => {
            "Opening...".to_string()
        }
        None => String::new(),
    }
}

pub fn draw_ui(frame: &mut Frame, engine: &NavigationEngine, theme: &Theme, spinner_frame: usize) {
    let [title_area, main_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let breadcrumb = engine
        .stack()
        .iter()
        .map(|d| d.template().to_string())
        .collect();
    TitleBar::new(breadcrumb, status_message(engine)).render(frame, title_area);

    if let Some(top) = engine.stack().top() {
        ScreenViewWidget::new(top.screen().view(), theme).render(frame, main_area);
    }

    let state = engine.overlay().state();
    if matches!(state, LoadingState::Visible | LoadingState::Cancelling) {
        Spinner {
            frame: spinner_frame,
            fading: state == LoadingState::Cancelling,
        }
        .render(frame, main_area);
    }

    if let Some(dialog) = engine.dialog() {
        DialogBox::new(dialog).render(frame, main_area);
    }

    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}
