//! Axis-aligned collision detection
//!
//! Brute force is plenty here: one player against a few dozen falling
//! entities. Nothing is tracked between frames.

use glam::Vec2;
use rand::Rng;

use super::entities::{Entity, Player};
use super::hud::Hud;
use super::spawner::Spawner;
use crate::audio::SoundBank;

/// Sound cue played when a shard is collected
pub const PICKUP_CUE: &str = "pickup";

/// Axis-aligned bounding box (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }
}

/// Player vs obstacles (fatal) and player vs shards (pickup)
#[derive(Debug, Default)]
pub struct CollisionSystem {
    player_collided: bool,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the last update found the player touching an obstacle
    pub fn player_collided(&self) -> bool {
        self.player_collided
    }

    /// Recompute collisions for this frame.
    ///
    /// Collected shards are only marked dead; the spawner prunes them on its
    /// next update.
    pub fn update<R: Rng>(
        &mut self,
        player: &Player,
        spawner: &mut Spawner<R>,
        hud: &mut Hud,
        audio: &mut SoundBank,
    ) {
        self.player_collided = false;
        let p = player.hitbox();

        if spawner
            .obstacles()
            .iter()
            .any(|o| p.intersects(&o.hitbox()))
        {
            self.player_collided = true;
            return;
        }

        for shard in spawner.shards_mut().iter_mut().rev() {
            if shard.is_alive() && p.intersects(&shard.hitbox()) {
                hud.add_score(i64::from(shard.score_value()));
                if audio.has_sound_effect(PICKUP_CUE) {
                    audio.play_effect(PICKUP_CUE, None, 1);
                }
                shard.kill();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Obstacle, Shard};

    fn world() -> Vec2 {
        Vec2::new(960.0, 540.0)
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(&Aabb::new(2.0, 2.0, 2.0, 2.0)));
        assert!(!a.intersects(&Aabb::new(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_aabb_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Aabb::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_obstacle_hit_sets_player_collided() {
        let player = Player::new(Vec2::new(100.0, 100.0), world());
        let mut spawner = Spawner::with_seed(world(), 50, 3.5, 0.0, 1);
        spawner.push_obstacle(Obstacle::new(
            Vec2::new(110.0, 90.0),
            Vec2::new(40.0, 30.0),
            3.5,
            540.0,
        ));
        let mut hud = Hud::new(10);
        let mut audio = SoundBank::new();
        let mut collisions = CollisionSystem::new();

        collisions.update(&player, &mut spawner, &mut hud, &mut audio);
        assert!(collisions.player_collided());
    }

    #[test]
    fn test_flag_resets_each_update() {
        let player = Player::new(Vec2::new(100.0, 100.0), world());
        let mut spawner = Spawner::with_seed(world(), 50, 3.5, 0.0, 1);
        let mut hud = Hud::new(10);
        let mut audio = SoundBank::new();
        let mut collisions = CollisionSystem::new();

        spawner.push_obstacle(Obstacle::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(40.0, 30.0),
            3.5,
            540.0,
        ));
        collisions.update(&player, &mut spawner, &mut hud, &mut audio);
        assert!(collisions.player_collided());

        spawner.clear();
        collisions.update(&player, &mut spawner, &mut hud, &mut audio);
        assert!(!collisions.player_collided());
    }

    #[test]
    fn test_shard_pickup_credits_score_and_kills_shard() {
        let player = Player::new(Vec2::new(100.0, 100.0), world());
        let mut spawner = Spawner::with_seed(world(), 50, 3.5, 0.0, 1);
        spawner.push_shard(Shard::new(
            Vec2::new(105.0, 105.0),
            Vec2::new(20.0, 12.0),
            2.0,
            12,
            540.0,
        ));
        spawner.push_shard(Shard::new(
            Vec2::new(600.0, 105.0),
            Vec2::new(20.0, 12.0),
            2.0,
            7,
            540.0,
        ));
        let mut hud = Hud::new(10);
        let mut audio = SoundBank::new();
        let mut collisions = CollisionSystem::new();

        collisions.update(&player, &mut spawner, &mut hud, &mut audio);

        assert!(!collisions.player_collided());
        assert_eq!(hud.score(), 12);
        assert!(!spawner.shards()[0].is_alive());
        assert!(spawner.shards()[1].is_alive());

        // Collected shards are gone after the spawner's next pass
        spawner.update();
        assert_eq!(spawner.shards().len(), 1);
    }

    #[test]
    fn test_obstacle_hit_skips_shard_pickup() {
        let player = Player::new(Vec2::new(100.0, 100.0), world());
        let mut spawner = Spawner::with_seed(world(), 50, 3.5, 0.0, 1);
        spawner.push_obstacle(Obstacle::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(40.0, 30.0),
            3.5,
            540.0,
        ));
        spawner.push_shard(Shard::new(
            Vec2::new(105.0, 105.0),
            Vec2::new(20.0, 12.0),
            2.0,
            9,
            540.0,
        ));
        let mut hud = Hud::new(10);
        let mut audio = SoundBank::new();
        let mut collisions = CollisionSystem::new();

        collisions.update(&player, &mut spawner, &mut hud, &mut audio);
        assert!(collisions.player_collided());
        assert_eq!(hud.score(), 0);
        assert!(spawner.shards()[0].is_alive());
    }
}
