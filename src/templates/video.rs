//! `Video`: shows what would be played. Playback itself belongs to the
//! platform and is not part of this crate.

use serde_json::Value;

use crate::core::screen::{ContentError, ContentSource, Screen, ScreenView, ViewLayout};

pub const TEMPLATE: &str = "Video";

pub struct VideoScreen {
    data: Value,
    stream_url: Option<String>,
}

impl VideoScreen {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            stream_url: None,
        }
    }
}

impl Screen for VideoScreen {
    fn template(&self) -> &str {
        TEMPLATE
    }

    /// The string data is the stream itself, not a document to fetch.
    fn content_source(&self) -> ContentSource {
        ContentSource::Inline(self.data.clone())
    }

    fn render(&mut self, document: &Value) -> Result<(), ContentError> {
        let url = document
            .as_str()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ContentError::new(TEMPLATE, "expected a stream URL string"))?;
        self.stream_url = Some(url.to_string());
        Ok(())
    }

    fn view(&self) -> ScreenView {
        ScreenView {
            layout: ViewLayout::Media,
            title: Some("Now Playing".to_string()),
            details: self.stream_url.iter().cloned().collect(),
            ..Default::default()
        }
    }
}
