//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::document::NavigationRequest;
use crate::core::engine::{EngineSettings, NavigationEngine};
use crate::core::screen::{ContentError, ContentSource, Screen, ScreenInput, ScreenView};
use crate::core::templates::TemplateRegistry;
use crate::fetch::{ContentFetcher, FetchError};

pub const ROOT_URL: &str = "http://tv.test/root.json";

/// Shared record of what screens went through.
#[derive(Clone, Default)]
pub struct Probe {
    journal: Arc<Mutex<Vec<String>>>,
    renders: Arc<AtomicUsize>,
}

impl Probe {
    pub fn events(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.journal.lock().unwrap().clear();
    }

    /// Successful `render` calls across all screens.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    fn record(&self, event: String) {
        self.journal.lock().unwrap().push(event);
    }
}

/// A screen that journals its lifecycle hooks.
///
/// Content: string data is fetched, anything else is inline. A document with
/// `"reject": true` fails to render. `"next"` is where Select navigates to.
pub struct RecordingScreen {
    label: String,
    data: Value,
    document: Value,
    focus: usize,
    probe: Probe,
}

impl RecordingScreen {
    pub fn new(label: &str, data: Value, probe: &Probe) -> Self {
        Self {
            label: label.to_string(),
            data,
            document: Value::Null,
            focus: 0,
            probe: probe.clone(),
        }
    }

    fn hook(&self, name: &str) {
        self.probe.record(format!("{}:{}", self.label, name));
    }
}

impl Screen for RecordingScreen {
    fn template(&self) -> &str {
        &self.label
    }

    fn content_source(&self) -> ContentSource {
        ContentSource::from_data(&self.data)
    }

    fn render(&mut self, document: &Value) -> Result<(), ContentError> {
        if document.get("reject") == Some(&Value::Bool(true)) {
            return Err(ContentError::new(&self.label, "rejected by test"));
        }
        self.document = document.clone();
        self.probe.renders.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn view(&self) -> ScreenView {
        let items = self
            .document
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        ScreenView {
            title: Some(self.label.clone()),
            items,
            focused: Some(self.focus),
            ..Default::default()
        }
    }

    fn handle_input(&mut self, input: ScreenInput) -> Option<NavigationRequest> {
        match input {
            ScreenInput::Up | ScreenInput::Left => self.focus = self.focus.saturating_sub(1),
            ScreenInput::Down | ScreenInput::Right => self.focus += 1,
            ScreenInput::Select => {
                return self
                    .document
                    .get("next")
                    .and_then(Value::as_str)
                    .map(|url| NavigationRequest::Url(url.to_string()));
            }
        }
        None
    }

    fn focus(&self) -> Option<usize> {
        Some(self.focus)
    }

    fn restore_focus(&mut self, index: usize) {
        self.focus = index;
    }

    fn will_show(&mut self) {
        self.hook("will_show");
    }

    fn did_show(&mut self) {
        self.hook("did_show");
    }

    fn will_hide(&mut self) {
        self.hook("will_hide");
    }

    fn did_hide(&mut self) {
        self.hook("did_hide");
    }
}

/// `Menu` and `PosterList` backed by recording screens.
pub fn test_registry(probe: &Probe) -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    for name in ["Menu", "PosterList"] {
        let probe = probe.clone();
        registry.register(name, move |data| {
            Box::new(RecordingScreen::new(name, data, &probe)) as Box<dyn Screen>
        });
    }
    registry
}

pub fn test_settings() -> EngineSettings {
    EngineSettings {
        client_version: 1,
        root_url: ROOT_URL.to_string(),
        root_template: "Menu".to_string(),
        spinner_delay: Duration::from_millis(500),
        animation_time: Duration::from_millis(250),
        content_cache_time: Duration::from_secs(600),
    }
}

pub fn test_engine(probe: &Probe) -> NavigationEngine {
    NavigationEngine::new(test_registry(probe), test_settings())
}

/// Answers from a fixed table; unknown URLs are a 404.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<Value, u16>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), Ok(body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    /// Every fetch sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
