//! `PosterList`: a vertical list of posters with details for the focused one.

use serde::Deserialize;
use serde_json::Value;

use crate::core::document::{ActionLink, NavigationRequest, UrlSet};
use crate::core::screen::{ContentError, ContentSource, Screen, ScreenInput, ScreenView, ViewLayout};
use crate::templates::{TemplateOptions, decode, step};

pub const TEMPLATE: &str = "PosterList";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterListDocument {
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(default, alias = "BackgroundImage")]
    pub background_image: Option<UrlSet>,
    #[serde(default, alias = "Items")]
    pub items: Vec<PosterItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterItem {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Image")]
    pub image: Option<UrlSet>,
    #[serde(default, alias = "DetailLeft")]
    pub detail_left: Option<String>,
    #[serde(default, alias = "DetailRight")]
    pub detail_right: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub link: ActionLink,
}

pub struct PosterListScreen {
    data: Value,
    options: TemplateOptions,
    document: PosterListDocument,
    focus: usize,
}

impl PosterListScreen {
    pub fn new(data: Value, options: TemplateOptions) -> Self {
        Self {
            data,
            options,
            document: PosterListDocument::default(),
            focus: 0,
        }
    }

    fn details(&self, item: &PosterItem) -> Vec<String> {
        let mut details = Vec::new();
        let left = item.detail_left.as_deref().unwrap_or_default();
        let right = item.detail_right.as_deref().unwrap_or_default();
        match (left.is_empty(), right.is_empty()) {
            (false, false) => details.push(format!("{}  ·  {}", left, right)),
            (false, true) => details.push(left.to_string()),
            (true, false) => details.push(right.to_string()),
            (true, true) => {}
        }
        if let Some(description) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
            details.push(description.to_string());
        }
        if let Some(poster) = item
            .image
            .as_ref()
            .and_then(|set| set.best_match(self.options.resolution_height))
        {
            details.push(format!("Poster: {}", poster));
        }
        details
    }
}

impl Screen for PosterListScreen {
    fn template(&self) -> &str {
        TEMPLATE
    }

    fn content_source(&self) -> ContentSource {
        ContentSource::from_data(&self.data)
    }

    fn render(&mut self, document: &Value) -> Result<(), ContentError> {
        self.document = decode(TEMPLATE, document)?;
        self.focus = step(self.focus, 0, self.document.items.len());
        Ok(())
    }

    fn view(&self) -> ScreenView {
        let focused = self.focus();
        ScreenView {
            layout: ViewLayout::List,
            title: Some(self.document.title.clone()).filter(|t| !t.is_empty()),
            background: self
                .document
                .background_image
                .as_ref()
                .and_then(|set| set.best_match(self.options.resolution_height))
                .map(str::to_string),
            items: self.document.items.iter().map(|i| i.title.clone()).collect(),
            focused,
            details: focused
                .and_then(|i| self.document.items.get(i))
                .map(|item| self.details(item))
                .unwrap_or_default(),
        }
    }

    fn handle_input(&mut self, input: ScreenInput) -> Option<NavigationRequest> {
        let len = self.document.items.len();
        match input {
            ScreenInput::Up => self.focus = step(self.focus, -1, len),
            ScreenInput::Down => self.focus = step(self.focus, 1, len),
            ScreenInput::Select => return self.document.items.get(self.focus)?.link.request(),
            ScreenInput::Left | ScreenInput::Right => {}
        }
        None
    }

    fn focus(&self) -> Option<usize> {
        (!self.document.items.is_empty()).then_some(self.focus)
    }

    fn restore_focus(&mut self, index: usize) {
        self.focus = step(index, 0, self.document.items.len());
    }
}
