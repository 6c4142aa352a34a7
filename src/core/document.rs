//! # Wire Documents
//!
//! The JSON shapes the server sends that the core itself understands.
//! Everything template-specific stays opaque (`serde_json::Value`) until a
//! screen decodes it.
//!
//! ```text
//! { "template": "Menu", "data": { ... }, "requiredCrexVersion": 1 }
//! ```
//!
//! Field names are camelCase on the wire. The PascalCase names of the older
//! server builds are accepted as aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An instruction to display a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrexAction {
    #[serde(alias = "Template")]
    pub template: String,
    /// Passed verbatim to the screen factory. The engine never inspects it.
    #[serde(default, alias = "Data")]
    pub data: Value,
    #[serde(
        default,
        alias = "RequiredCrexVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_crex_version: Option<u32>,
}

impl CrexAction {
    pub fn new(template: impl Into<String>, data: Value) -> Self {
        Self {
            template: template.into(),
            data,
            required_crex_version: None,
        }
    }

    /// True when this action needs a newer client than `client_version`.
    pub fn requires_newer_client(&self, client_version: u32) -> bool {
        self.required_crex_version
            .is_some_and(|required| required > client_version)
    }
}

/// What a navigation attempt was asked to do. Kept by the attempt so that
/// Retry can re-issue the identical request.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationRequest {
    Url(String),
    Action(CrexAction),
}

impl NavigationRequest {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            NavigationRequest::Url(url) => format!("url {}", url),
            NavigationRequest::Action(action) => format!("template {}", action.template),
        }
    }
}

/// The "where does this go" part of menu buttons and poster items.
/// An inline action wins over an action URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLink {
    #[serde(default, alias = "Action", skip_serializing_if = "Option::is_none")]
    pub action: Option<CrexAction>,
    #[serde(default, alias = "ActionUrl", skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl ActionLink {
    pub fn request(&self) -> Option<NavigationRequest> {
        if let Some(action) = &self.action {
            return Some(NavigationRequest::Action(action.clone()));
        }
        self.action_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| NavigationRequest::Url(url.to_string()))
    }
}

/// Multiple resolutions of the same image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlSet {
    #[serde(default, alias = "HD", skip_serializing_if = "Option::is_none")]
    pub hd: Option<String>,
    #[serde(default, alias = "FHD", skip_serializing_if = "Option::is_none")]
    pub fhd: Option<String>,
    #[serde(default, alias = "UHD", skip_serializing_if = "Option::is_none")]
    pub uhd: Option<String>,
}

impl UrlSet {
    /// Highest resolution available.
    pub fn best_quality(&self) -> Option<&str> {
        first_present([&self.uhd, &self.fhd, &self.hd])
    }

    /// Closest match for a display of the given pixel height, preferring
    /// larger images over smaller ones.
    pub fn best_match(&self, display_height: u32) -> Option<&str> {
        if display_height >= 2160 {
            first_present([&self.uhd, &self.fhd, &self.hd])
        } else if display_height >= 1080 {
            first_present([&self.fhd, &self.uhd, &self.hd])
        } else {
            first_present([&self.hd, &self.fhd, &self.uhd])
        }
    }
}

fn first_present<'a>(candidates: [&'a Option<String>; 3]) -> Option<&'a str> {
    candidates
        .into_iter()
        .filter_map(|c| c.as_deref())
        .find(|url| !url.trim().is_empty())
}
