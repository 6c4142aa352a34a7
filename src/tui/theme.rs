//! Colors from `[menu_bar]` in the config.
//!
//! Accepts `#rrggbb` and `#aarrggbb`. Terminals have no alpha channel, so
//! the alpha byte is dropped.

use log::warn;
use ratatui::style::Color;

use crate::core::config::{
    DEFAULT_MENU_BACKGROUND, DEFAULT_MENU_FOCUSED, DEFAULT_MENU_UNFOCUSED, MenuBarColors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub menu_background: Color,
    pub focused_text: Color,
    pub unfocused_text: Color,
}

impl Theme {
    pub fn from_config(colors: &MenuBarColors) -> Self {
        Self {
            menu_background: color_or(&colors.background, DEFAULT_MENU_BACKGROUND),
            focused_text: color_or(&colors.focused_text, DEFAULT_MENU_FOCUSED),
            unfocused_text: color_or(&colors.unfocused_text, DEFAULT_MENU_UNFOCUSED),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            menu_background: color_or(DEFAULT_MENU_BACKGROUND, DEFAULT_MENU_BACKGROUND),
            focused_text: color_or(DEFAULT_MENU_FOCUSED, DEFAULT_MENU_FOCUSED),
            unfocused_text: color_or(DEFAULT_MENU_UNFOCUSED, DEFAULT_MENU_UNFOCUSED),
        }
    }
}

pub fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().strip_prefix('#').filter(|h| h.is_ascii())?;
    let rgb = match hex.len() {
        6 => hex,
        8 => &hex[2..],
        _ => return None,
    };
    let value = u32::from_str_radix(rgb, 16).ok()?;
    Some(Color::Rgb(
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

fn color_or(raw: &str, fallback: &str) -> Color {
    parse_hex_color(raw).unwrap_or_else(|| {
        warn!("Invalid color {:?}, using {}", raw, fallback);
        parse_hex_color(fallback).unwrap_or(Color::Reset)
    })
}
