//! Toolkit-independent description of the main window.
//!
//! The window is a single vertical column: image, caption, then the two
//! placeholder buttons. Only sizes, paths and colors come from the config;
//! texts and order are fixed.

use std::path::PathBuf;

use crate::config::{AppConfig, Rgb};

pub const CAPTION: &str = "Bruce app";
pub const UPDATE_FIRMWARE: &str = "Update firmware";
pub const SERIAL: &str = "Serial";

// Only `Center` is used by the fixed layout.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSpec {
    Image {
        path: PathBuf,
        max_width: u32,
        max_height: u32,
    },
    Text {
        text: String,
        alignment: Alignment,
    },
    /// Buttons are inert: a label and nothing else.
    Button { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub label_text: Rgb,
    pub button_text: Rgb,
    pub button_background: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainLayout {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub widgets: Vec<WidgetSpec>,
    pub palette: Palette,
}

impl Default for MainLayout {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl MainLayout {
    pub fn from_config(config: &AppConfig) -> Self {
        let widgets = vec![
            WidgetSpec::Image {
                path: config.image.path.clone(),
                max_width: config.image.max_width,
                max_height: config.image.max_height,
            },
            WidgetSpec::Text {
                text: CAPTION.to_string(),
                alignment: Alignment::Center,
            },
            WidgetSpec::Button {
                label: UPDATE_FIRMWARE.to_string(),
            },
            WidgetSpec::Button {
                label: SERIAL.to_string(),
            },
        ];

        Self {
            title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            widgets,
            palette: Palette {
                background: config.style.background,
                label_text: config.style.label_text,
                button_text: config.style.button_text,
                button_background: config.style.button_background,
            },
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().filter_map(|w| match w {
            WidgetSpec::Button { label } => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn text_views(&self) -> impl Iterator<Item = (&str, Alignment)> {
        self.widgets.iter().filter_map(|w| match w {
            WidgetSpec::Text { text, alignment } => Some((text.as_str(), *alignment)),
            _ => None,
        })
    }
}
