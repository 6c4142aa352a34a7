use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components follow the props pattern:
/// - They receive data via struct fields, built fresh each frame.
/// - They render to a `Frame` within a given `Rect`.
///
/// The engine stays the single owner of navigation state; components only
/// ever borrow snapshots of it.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
