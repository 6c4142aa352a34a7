//! `Menu`: a background image with a row of buttons along the bottom.

use serde::Deserialize;
use serde_json::Value;

use crate::core::document::{ActionLink, NavigationRequest, UrlSet};
use crate::core::screen::{ContentError, ContentSource, Screen, ScreenInput, ScreenView, ViewLayout};
use crate::templates::{TemplateOptions, decode, step};

pub const TEMPLATE: &str = "Menu";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    #[serde(default, alias = "BackgroundImage")]
    pub background_image: Option<UrlSet>,
    #[serde(default, alias = "Buttons")]
    pub buttons: Vec<MenuButton>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuButton {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub link: ActionLink,
    #[serde(default, alias = "RequiredCrexVersion")]
    pub required_crex_version: Option<u32>,
}

pub struct MenuScreen {
    data: Value,
    options: TemplateOptions,
    background: Option<String>,
    /// Only the buttons this client is allowed to show.
    buttons: Vec<MenuButton>,
    focus: usize,
}

impl MenuScreen {
    pub fn new(data: Value, options: TemplateOptions) -> Self {
        Self {
            data,
            options,
            background: None,
            buttons: Vec::new(),
            focus: 0,
        }
    }
}

impl Screen for MenuScreen {
    fn template(&self) -> &str {
        TEMPLATE
    }

    fn content_source(&self) -> ContentSource {
        ContentSource::from_data(&self.data)
    }

    fn render(&mut self, document: &Value) -> Result<(), ContentError> {
        let menu: MenuDocument = decode(TEMPLATE, document)?;
        let version = self.options.client_version;

        self.background = menu
            .background_image
            .as_ref()
            .and_then(|set| set.best_match(self.options.resolution_height))
            .map(str::to_string);
        self.buttons = menu
            .buttons
            .into_iter()
            .filter(|b| b.required_crex_version.is_none_or(|v| v <= version))
            .collect();
        self.focus = step(self.focus, 0, self.buttons.len());
        Ok(())
    }

    fn view(&self) -> ScreenView {
        ScreenView {
            layout: ViewLayout::MenuBar,
            title: None,
            background: self.background.clone(),
            items: self.buttons.iter().map(|b| b.title.clone()).collect(),
            focused: self.focus(),
            details: Vec::new(),
        }
    }

    fn handle_input(&mut self, input: ScreenInput) -> Option<NavigationRequest> {
        match input {
            ScreenInput::Left => self.focus = step(self.focus, -1, self.buttons.len()),
            ScreenInput::Right => self.focus = step(self.focus, 1, self.buttons.len()),
            ScreenInput::Select => return self.buttons.get(self.focus)?.link.request(),
            ScreenInput::Up | ScreenInput::Down => {}
        }
        None
    }

    fn focus(&self) -> Option<usize> {
        (!self.buttons.is_empty()).then_some(self.focus)
    }

    fn restore_focus(&mut self, index: usize) {
        self.focus = step(index, 0, self.buttons.len());
    }
}
