//! # TUI Components
//!
//! All components are stateless: they receive a snapshot as props, built
//! fresh each frame from the engine, and draw it. Selection and focus live
//! in the engine and its screens, never here.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (app name, breadcrumb, status)
//! ├── screen_view.rs   (the top screen, one arrangement per layout)
//! ├── spinner.rs       (loading overlay)
//! └── dialog.rs        (modal error dialogs)
//! ```
//!
//! Draw order matters: the screen first, then the spinner, then the dialog,
//! so a dialog always sits above everything else.

mod dialog;
mod screen_view;
mod spinner;
mod title_bar;

pub use dialog::DialogBox;
pub use screen_view::ScreenViewWidget;
pub use spinner::Spinner;
pub use title_bar::TitleBar;
