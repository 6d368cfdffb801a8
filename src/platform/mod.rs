//! Platform layer on top of winit
//!
//! - `input`: Key state from keyboard events, exposed as an `InputSource`
//! - `time`: Fixed-step frame clock
//! - `window`: Window creation and fullscreen toggling

pub mod input;
pub mod time;
pub mod window;

pub use input::{InputState, Key, map_key};
pub use time::FrameClock;
pub use window::{WindowConfig, create_window, toggle_fullscreen};
