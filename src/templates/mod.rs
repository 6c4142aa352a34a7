//! # Templates
//!
//! The screens the server can ask for by name. Each one decodes its own
//! content document and exposes a [`ScreenView`](crate::core::screen::ScreenView).
//!
//! | Template     | Data                        | Input              |
//! |--------------|-----------------------------|--------------------|
//! | `Menu`       | menu document or its URL    | Left/Right, Select |
//! | `PosterList` | poster document or its URL  | Up/Down, Select    |
//! | `Image`      | `UrlSet`                    | none               |
//! | `Video`      | stream URL                  | none               |

pub mod image;
pub mod menu;
pub mod poster_list;
pub mod video;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::screen::{ContentError, Screen};
use crate::core::templates::TemplateRegistry;

pub use image::ImageScreen;
pub use menu::MenuScreen;
pub use poster_list::PosterListScreen;
pub use video::VideoScreen;

/// What template screens need to know about the running client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    pub client_version: u32,
    /// Picks the image variant from a `UrlSet`.
    pub resolution_height: u32,
}

/// Registry with every built-in template.
pub fn default_registry(options: TemplateOptions) -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    registry.register(menu::TEMPLATE, move |data| {
        Box::new(MenuScreen::new(data, options)) as Box<dyn Screen>
    });
    registry.register(poster_list::TEMPLATE, move |data| {
        Box::new(PosterListScreen::new(data, options)) as Box<dyn Screen>
    });
    registry.register(image::TEMPLATE, move |data| {
        Box::new(ImageScreen::new(data, options)) as Box<dyn Screen>
    });
    registry.register(video::TEMPLATE, |data| {
        Box::new(VideoScreen::new(data)) as Box<dyn Screen>
    });
    registry
}

fn decode<T: DeserializeOwned>(template: &str, document: &Value) -> Result<T, ContentError> {
    T::deserialize(document).map_err(|e| ContentError::new(template, e))
}

/// Moves `focus` by `delta` within `0..len`.
fn step(focus: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    focus.saturating_add_signed(delta).min(len - 1)
}
