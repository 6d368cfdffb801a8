//! Neon Drift entry point
//!
//! winit drives the event loop. Each redraw pays real time out as fixed 60 Hz
//! simulation steps, then draws the active mode once and presents it.

use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use neon_drift::audio::SoundBank;
use neon_drift::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use neon_drift::game::{self, Game};
use neon_drift::persistence::BestScoreStore;
use neon_drift::platform::{
    FrameClock, InputState, Key, WindowConfig, create_window, map_key, toggle_fullscreen,
};
use neon_drift::renderer::{RenderState, ShapeBatch, colors};
use neon_drift::resources::ResourceBundles;
use neon_drift::Settings;

const MAIN_BUNDLE: &str = "main";
const MAIN_MANIFEST: &str = "main.txt";

/// Everything that needs a window to exist
struct Running {
    window: Arc<Window>,
    render: RenderState,
    game: Game,
    clock: FrameClock,
    batch: ShapeBatch,
}

struct App {
    settings: Settings,
    world: Vec2,
    input: InputState,
    audio: SoundBank,
    bundles: ResourceBundles,
    running: Option<Running>,
    /// Startup failure reported once the loop returns
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings) -> Self {
        let mut audio = SoundBank::new();
        audio.apply_settings(&settings);

        let mut bundles = ResourceBundles::from_env();
        if let Err(e) = bundles.load(MAIN_BUNDLE, MAIN_MANIFEST, &mut audio) {
            log::error!("Failed to load resources from {}: {e}", bundles.root().display());
        }
        audio.init();

        Self {
            settings,
            world: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            input: InputState::new(),
            audio,
            bundles,
            running: None,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Running> {
        let config = WindowConfig {
            fullscreen: self.settings.start_fullscreen,
            ..WindowConfig::default()
        };
        let window = create_window(event_loop, &config)?;
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let render = pollster::block_on(RenderState::new(Arc::clone(&window), self.world))
            .context("failed to initialise the renderer")?;
        let game = Game::new(
            BestScoreStore::default_location(),
            self.world,
            game::seed_from_env(),
            &self.input,
            &mut self.audio,
        );

        Ok(Running {
            window,
            render,
            game,
            clock: FrameClock::new(),
            batch: ShapeBatch::new(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        running.clock.begin_frame();
        running
            .game
            .run_steps(&mut running.clock, &mut self.input, &mut self.audio);
        if running.game.should_quit() {
            event_loop.exit();
            return;
        }

        running.batch.clear();
        running.game.draw(&mut running.batch);
        if self.settings.show_fps {
            let fps = format!("{:.0} FPS", running.clock.smoothed_fps);
            running
                .batch
                .text(&fps, 8.0, self.world.y - 16.0, colors::GREY);
        }

        match running.render.render(&running.batch) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                running.render.reconfigure();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }

    fn shutdown(&mut self) {
        self.audio.stop_music();
        if let Some(running) = self.running.take() {
            // Exits the active mode
            drop(running.game);
        }
        self.bundles.free(MAIN_BUNDLE, &mut self.audio);
        self.settings.save();
        log::info!("Shut down");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                log::error!("Startup failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                running.game.request_quit();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                running.render.resize(size.width, size.height);
            }

            WindowEvent::Focused(focused) => {
                if focused {
                    running.clock.reset();
                } else {
                    self.input.release_all();
                }
                if self.settings.mute_on_blur {
                    self.audio.set_muted(!focused);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(key) = map_key(code) else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        if key == Key::F11 && !event.repeat {
                            toggle_fullscreen(&running.window);
                        }
                        self.input.key_down(key);
                    }
                    ElementState::Released => self.input.key_up(key),
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn run() -> anyhow::Result<()> {
    log::info!("Neon Drift starting...");
    let settings = Settings::load();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app).context("event loop error")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
