// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;

mod assets;
mod config;
mod layout;
mod ui;

slint::include_modules!();

fn main() -> anyhow::Result<()> {
    config::init_config();
    log::info!("init_config");

    let layout = layout::MainLayout::from_config(&config::get_config());
    log::info!(
        "layout: {} widgets, captions {:?}, buttons {:?}",
        layout.widgets.len(),
        layout.text_views().map(|(text, _)| text).collect::<Vec<_>>(),
        layout.buttons().collect::<Vec<_>>()
    );

    let window = ui::build_window(&layout).context("failed to create AppWindow")?;
    log::info!("showing window \"{}\"", layout.title);

    window.run().context("event loop failed")?;
    log::info!("window closed");

    Ok(())
}
