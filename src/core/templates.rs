//! # Template Registry
//!
//! Maps template names from action documents to screen factories.
//! The platform adapter fills the table once at startup; after that a
//! lookup is a plain map access. An unknown name is an ordinary, reportable
//! error instead of a crash.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;

use crate::core::screen::Screen;

/// Builds a screen from the action's opaque data.
pub type ScreenFactory = Box<dyn Fn(Value) -> Box<dyn Screen> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no screen registered for template '{0}'")]
pub struct NotFoundError(pub String);

#[derive(Default)]
pub struct TemplateRegistry {
    factories: HashMap<String, ScreenFactory>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Value) -> Box<dyn Screen> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            warn!("Template '{}' registered twice; replacing factory", name);
        }
        debug!("Registered template '{}'", name);
        self.factories.insert(name, Box::new(factory));
    }

    pub fn resolve(&self, name: &str) -> Result<&ScreenFactory, NotFoundError> {
        self.factories.get(name).ok_or_else(|| {
            warn!("Unknown template requested: '{}'", name);
            NotFoundError(name.to_string())
        })
    }

    /// Resolves `name` and builds a screen for `data`.
    pub fn instantiate(&self, name: &str, data: Value) -> Result<Box<dyn Screen>, NotFoundError> {
        let factory = self.resolve(name)?;
        Ok(factory(data))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered template names, sorted.
    pub fn templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
