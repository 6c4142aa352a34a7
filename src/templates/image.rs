//! `Image`: one full-screen picture.

use serde_json::Value;

use crate::core::document::UrlSet;
use crate::core::screen::{ContentError, ContentSource, Screen, ScreenView, ViewLayout};
use crate::templates::{TemplateOptions, decode};

pub const TEMPLATE: &str = "Image";

pub struct ImageScreen {
    data: Value,
    options: TemplateOptions,
    url: Option<String>,
    /// Largest variant, when it isn't the one shown.
    full_size: Option<String>,
}

impl ImageScreen {
    pub fn new(data: Value, options: TemplateOptions) -> Self {
        Self {
            data,
            options,
            url: None,
            full_size: None,
        }
    }
}

impl Screen for ImageScreen {
    fn template(&self) -> &str {
        TEMPLATE
    }

    /// The data is the `UrlSet` itself; nothing to fetch.
    fn content_source(&self) -> ContentSource {
        ContentSource::Inline(self.data.clone())
    }

    fn render(&mut self, document: &Value) -> Result<(), ContentError> {
        let set: UrlSet = decode(TEMPLATE, document)?;
        let url = set
            .best_match(self.options.resolution_height)
            .ok_or_else(|| ContentError::new(TEMPLATE, "no image URL"))?;
        self.full_size = set
            .best_quality()
            .filter(|best| *best != url)
            .map(str::to_string);
        self.url = Some(url.to_string());
        Ok(())
    }

    fn view(&self) -> ScreenView {
        ScreenView {
            layout: ViewLayout::Media,
            background: self.url.clone(),
            details: self
                .url
                .iter()
                .cloned()
                .chain(self.full_size.iter().map(|u| format!("Full size: {}", u)))
                .collect(),
            ..Default::default()
        }
    }
}
