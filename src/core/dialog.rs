//! # Dialogs
//!
//! The two modal dialogs the engine can raise. Presentation is up to the
//! adapter; this is only the content and the button selection.

use crate::core::document::NavigationRequest;

pub const DATA_ERROR_TITLE: &str = "Error Loading Data";
pub const DATA_ERROR_MESSAGE: &str =
    "An error occurred trying to load the content. Please try again later.";
pub const UPDATE_REQUIRED_TITLE: &str = "Update Required";
pub const UPDATE_REQUIRED_MESSAGE: &str = "An update is required to view this content.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    DataError,
    UpdateRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Retry,
    Cancel,
    Close,
}

impl DialogButton {
    pub fn label(&self) -> &'static str {
        match self {
            DialogButton::Retry => "Retry",
            DialogButton::Cancel => "Cancel",
            DialogButton::Close => "Close",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub buttons: Vec<DialogButton>,
    pub selected: usize,
    /// What Retry re-issues.
    pub retry: Option<NavigationRequest>,
}

impl Dialog {
    /// Retry + Cancel. Retry re-issues `request` unchanged.
    pub fn data_error(request: NavigationRequest) -> Self {
        Self {
            kind: DialogKind::DataError,
            title: DATA_ERROR_TITLE.to_string(),
            message: DATA_ERROR_MESSAGE.to_string(),
            buttons: vec![DialogButton::Retry, DialogButton::Cancel],
            selected: 0,
            retry: Some(request),
        }
    }

    /// Close only; an outdated client cannot retry its way past the gate.
    pub fn update_required() -> Self {
        Self {
            kind: DialogKind::UpdateRequired,
            title: UPDATE_REQUIRED_TITLE.to_string(),
            message: UPDATE_REQUIRED_MESSAGE.to_string(),
            buttons: vec![DialogButton::Close],
            selected: 0,
            retry: None,
        }
    }

    pub fn selected_button(&self) -> DialogButton {
        self.buttons
            .get(self.selected)
            .copied()
            .unwrap_or_else(|| self.cancel_button())
    }

    /// The button the remote's Back key stands for.
    pub fn cancel_button(&self) -> DialogButton {
        match self.kind {
            DialogKind::DataError => DialogButton::Cancel,
            DialogKind::UpdateRequired => DialogButton::Close,
        }
    }

    pub fn has_button(&self, button: DialogButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.buttons.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
