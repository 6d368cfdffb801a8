//! Frame-stepped simulation
//!
//! Everything gameplay lives here. One call to an `update` is one 60 Hz
//! frame; speeds and timers are measured in frames, not seconds. Entities
//! draw into a CPU-side [`ShapeBatch`](crate::renderer::ShapeBatch) and never
//! touch the GPU or the window.

pub mod collision;
pub mod entities;
pub mod hud;
pub mod input;
pub mod spawner;

pub use collision::{Aabb, CollisionSystem, PICKUP_CUE};
pub use entities::{Drifting, Entity, Obstacle, Player, Shard};
pub use hud::Hud;
pub use input::{InputSnapshot, InputSource};
pub use spawner::{Spawner, cooldown_interval, difficulty_factor};
