//! Neon Drift - a vertically scrolling neon lane runner
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawner, collisions, score)
//! - `modes`: Menu/Play/Pause/GameOver state machine
//! - `renderer`: Shape batching and the wgpu pipeline
//! - `platform`: Window, keyboard and frame pacing on top of winit
//! - `audio` / `resources`: Sound playback and named asset bundles
//! - `persistence`: Best score and per-user data directory

pub mod audio;
pub mod game;
pub mod modes;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod resources;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; every counter in the game is measured in these frames
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f64 = 1.0 / FRAMES_PER_SECOND as f64;
    /// Maximum substeps per presented frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical world (and initial window) size
    pub const WORLD_WIDTH: f32 = 960.0;
    pub const WORLD_HEIGHT: f32 = 540.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    /// Pixels per frame
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Distance of the spawn point above the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 100.0;

    /// Spawner defaults for a fresh run
    pub const SPAWN_INTERVAL: i32 = 50;
    pub const SPAWN_BASE_SPEED: f32 = 3.5;
    pub const SHARD_CHANCE: f64 = 0.25;
    /// Frames until the difficulty factor saturates (one minute)
    pub const DIFFICULTY_RAMP_FRAMES: f32 = 3600.0;

    /// Automatic score tick cadence
    pub const FRAMES_PER_POINT: u32 = 10;

    /// Play-field decoration
    pub const LANE_WIDTH: f32 = 96.0;
    pub const GRID_STEP: f32 = 32.0;
    pub const SCROLL_SPEED: f32 = 2.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
