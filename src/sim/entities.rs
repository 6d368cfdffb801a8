//! Player, obstacles and shards
//!
//! All three share the [`Entity`] capabilities (hitbox, liveness, draw).
//! Falling entities also implement [`Drifting`] so the spawner can advance
//! and prune them generically.

use glam::Vec2;

use super::collision::Aabb;
use super::input::InputSource;
use crate::consts::{PLAYER_HEIGHT, PLAYER_SPEED, PLAYER_WIDTH};
use crate::renderer::ShapeBatch;
use crate::renderer::colors;

/// Shared capabilities of everything on the play field
pub trait Entity {
    /// Axis-aligned bounding box used for collision checks
    fn hitbox(&self) -> Aabb;

    /// False once the entity should no longer be simulated or drawn
    fn is_alive(&self) -> bool {
        true
    }

    fn draw(&self, batch: &mut ShapeBatch);
}

/// An entity that falls on its own, one step per frame
pub trait Drifting: Entity {
    fn advance(&mut self);
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pos: Vec2,
    size: Vec2,
    speed: f32,
    /// Play-field bounds used for clamping
    world: Vec2,
}

impl Player {
    pub fn new(start: Vec2, world: Vec2) -> Self {
        Self {
            pos: start,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            world,
        }
    }

    /// Spawn point: horizontally centred, near the bottom edge
    pub fn spawn_point(world: Vec2) -> Vec2 {
        Vec2::new(
            (world.x - PLAYER_WIDTH) / 2.0,
            world.y - crate::consts::PLAYER_START_OFFSET,
        )
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Move by the held directions, then clamp to the world.
    ///
    /// The action channel is read by nothing yet.
    pub fn update(&mut self, input: &(impl InputSource + ?Sized)) {
        let mut delta = Vec2::ZERO;
        if input.left() {
            delta.x -= self.speed;
        }
        if input.right() {
            delta.x += self.speed;
        }
        if input.up() {
            delta.y -= self.speed;
        }
        if input.down() {
            delta.y += self.speed;
        }

        let max = (self.world - self.size).max(Vec2::ZERO);
        self.pos = (self.pos + delta).clamp(Vec2::ZERO, max);
    }
}

impl Entity for Player {
    fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        batch.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, colors::PLAYER);
        batch.stroke_rect(
            self.pos.x + 2.0,
            self.pos.y + 2.0,
            self.size.x - 4.0,
            self.size.y - 4.0,
            1.0,
            colors::OUTLINE,
        );
    }
}

/// A falling block that ends the run on contact
#[derive(Debug, Clone)]
pub struct Obstacle {
    pos: Vec2,
    size: Vec2,
    speed: f32,
    world_height: f32,
    alive: bool,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: Vec2, speed: f32, world_height: f32) -> Self {
        Self {
            pos,
            size,
            speed,
            world_height,
            alive: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Entity for Obstacle {
    fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        let Vec2 { x, y } = self.pos;
        let Vec2 { x: w, y: h } = self.size;
        batch.fill_rect(x, y, w, h, colors::OBSTACLE);
        batch.stroke_rect(x + 2.0, y + 2.0, w - 4.0, h - 4.0, 1.0, colors::OBSTACLE_EDGE);
        // Tail lights on the leading edge
        batch.fill_rect(x + 4.0, y + h - 6.0, 6.0, 3.0, colors::OBSTACLE_LIGHT);
        batch.fill_rect(x + w - 10.0, y + h - 6.0, 6.0, 3.0, colors::OBSTACLE_LIGHT);
    }
}

impl Drifting for Obstacle {
    fn advance(&mut self) {
        self.pos.y += self.speed;
        if self.pos.y > self.world_height {
            self.alive = false;
        }
    }
}

/// A collectible that awards score on pickup
#[derive(Debug, Clone)]
pub struct Shard {
    pos: Vec2,
    size: Vec2,
    speed: f32,
    score_value: u32,
    world_height: f32,
    alive: bool,
    /// Time base for the shimmer highlight
    shimmer: f32,
}

impl Shard {
    pub fn new(pos: Vec2, size: Vec2, speed: f32, score_value: u32, world_height: f32) -> Self {
        Self {
            pos,
            size,
            speed,
            score_value,
            world_height,
            alive: true,
            shimmer: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Points awarded on pickup
    pub fn score_value(&self) -> u32 {
        self.score_value
    }

    /// Mark for removal (collected)
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Entity for Shard {
    fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        let Vec2 { x, y } = self.pos;
        let Vec2 { x: w, y: h } = self.size;
        batch.fill_rect(x, y, w, h, colors::SHARD);
        batch.stroke_rect(x + 1.0, y + 1.0, w - 2.0, h - 2.0, 1.0, colors::OUTLINE);

        let hx = x + w * (0.2 + 0.1 * self.shimmer.sin());
        batch.line(hx, y + 2.0, hx, y + h - 2.0, 1.0, colors::WHITE);
    }
}

impl Drifting for Shard {
    fn advance(&mut self) {
        self.shimmer += 0.08;
        self.pos.y += self.speed;
        if self.pos.y > self.world_height {
            self.alive = false;
        }
    }
}
