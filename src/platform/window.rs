use std::sync::Arc;

use anyhow::Context;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Neon Drift".to_string(),
            width: WORLD_WIDTH as u32,
            height: WORLD_HEIGHT as u32,
            fullscreen: true,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> anyhow::Result<Arc<Window>> {
    let mut attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_min_inner_size(winit::dpi::LogicalSize::new(config.width / 4, config.height / 4));
    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")?;
    Ok(Arc::new(window))
}

/// Flip between borderless fullscreen and windowed; returns the new state
pub fn toggle_fullscreen(window: &Window) -> bool {
    let fullscreen = window.fullscreen().is_none();
    window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    log::info!(
        "Switched to {}",
        if fullscreen { "fullscreen" } else { "windowed" }
    );
    fullscreen
}
