use slint::{Color, ComponentHandle, Image, ModelRc, PlatformError, VecModel};

use crate::assets;
use crate::config::Rgb;
use crate::layout::{Alignment, MainLayout, WidgetSpec};
use crate::{AppState, AppWindow, HAlign, WidgetItem, WidgetKind};

/// Creates the window and fills `AppState` from the layout.
///
/// Nothing is bound to the buttons' presses.
pub fn build_window(layout: &MainLayout) -> Result<AppWindow, PlatformError> {
    let ui = AppWindow::new()?;
    apply_layout(&ui, layout);
    Ok(ui)
}

pub fn apply_layout(ui: &AppWindow, layout: &MainLayout) {
    let state = ui.global::<AppState>();

    state.set_window_title(layout.title.as_str().into());
    state.set_window_width(layout.width as f32);
    state.set_window_height(layout.height as f32);

    state.set_background(to_color(layout.palette.background));
    state.set_label_text(to_color(layout.palette.label_text));
    state.set_button_text(to_color(layout.palette.button_text));
    state.set_button_background(to_color(layout.palette.button_background));

    state.set_widgets(ModelRc::new(VecModel::from(widget_items(layout))));
}

/// One `WidgetItem` per `WidgetSpec`, in order. Images are loaded here.
pub fn widget_items(layout: &MainLayout) -> Vec<WidgetItem> {
    layout
        .widgets
        .iter()
        .map(|spec| match spec {
            WidgetSpec::Image {
                path,
                max_width,
                max_height,
            } => {
                let scaled = assets::load_scaled(path, *max_width, *max_height);
                WidgetItem {
                    kind: WidgetKind::ImageView,
                    text: Default::default(),
                    align: HAlign::Start,
                    source: scaled.image,
                    image_width: scaled.width as f32,
                    image_height: scaled.height as f32,
                }
            }
            WidgetSpec::Text { text, alignment } => WidgetItem {
                kind: WidgetKind::TextView,
                text: text.as_str().into(),
                align: to_halign(*alignment),
                source: Image::default(),
                image_width: 0.0,
                image_height: 0.0,
            },
            WidgetSpec::Button { label } => WidgetItem {
                kind: WidgetKind::Button,
                text: label.as_str().into(),
                align: HAlign::Center,
                source: Image::default(),
                image_width: 0.0,
                image_height: 0.0,
            },
        })
        .collect()
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb_u8(rgb.0, rgb.1, rgb.2)
}

fn to_halign(alignment: Alignment) -> HAlign {
    match alignment {
        Alignment::Start => HAlign::Start,
        Alignment::Center => HAlign::Center,
        Alignment::End => HAlign::End,
    }
}
