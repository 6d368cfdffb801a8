//! Obstacle and shard spawning with a difficulty ramp
//!
//! Every frame the cooldown counts down; on expiry exactly one entity is
//! created above the top edge and the cooldown is re-armed with a jittered
//! interval that shrinks as the run goes on. Entities are create-once: they
//! fall, expire below the bottom edge, and are dropped.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entities::{Drifting, Entity, Obstacle, Shard};
use crate::consts::{DIFFICULTY_RAMP_FRAMES, FRAMES_PER_SECOND};
use crate::lerp;
use crate::renderer::ShapeBatch;

/// Smallest interval the difficulty ramp can reach (before jitter)
pub const MIN_INTERVAL: i32 = 16;
/// Floor applied after jitter
pub const MIN_COOLDOWN: i32 = 8;
/// Jitter is drawn uniformly from `-JITTER..=JITTER`
pub const JITTER: i32 = 4;
/// Lower bound for the configured base interval
pub const MIN_BASE_INTERVAL: i32 = 10;

/// Cooldown for the next spawn, given the frame counter and a jitter draw
pub fn cooldown_interval(base_interval: i32, frame: u32, jitter: i32) -> i32 {
    let elapsed_seconds = (frame / FRAMES_PER_SECOND) as i32;
    let interval = (base_interval - elapsed_seconds / 10).max(MIN_INTERVAL);
    (interval + jitter).max(MIN_COOLDOWN)
}

/// Difficulty in `[0, 1]`, saturating after one minute of frames
pub fn difficulty_factor(frame: u32) -> f32 {
    (frame as f32 / DIFFICULTY_RAMP_FRAMES).min(1.0)
}

/// Owns the live obstacles and shards
#[derive(Debug, Clone)]
pub struct Spawner<R = Pcg32> {
    world: Vec2,
    obstacles: Vec<Obstacle>,
    shards: Vec<Shard>,
    rng: R,
    cooldown: i32,
    base_interval: i32,
    base_speed: f32,
    frame: u32,
    shard_chance: f64,
}

impl Spawner<Pcg32> {
    /// Spawner driven by a PCG generator seeded with `seed`
    pub fn with_seed(
        world: Vec2,
        initial_interval: i32,
        base_speed: f32,
        shard_chance: f64,
        seed: u64,
    ) -> Self {
        Self::new(
            world,
            initial_interval,
            base_speed,
            shard_chance,
            Pcg32::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> Spawner<R> {
    pub fn new(
        world: Vec2,
        initial_interval: i32,
        base_speed: f32,
        shard_chance: f64,
        rng: R,
    ) -> Self {
        let mut spawner = Self {
            world,
            obstacles: Vec::new(),
            shards: Vec::new(),
            rng,
            cooldown: 0,
            base_interval: initial_interval.max(MIN_BASE_INTERVAL),
            base_speed,
            frame: 0,
            shard_chance: shard_chance.clamp(0.0, 1.0),
        };
        spawner.reset_cooldown();
        spawner
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub(crate) fn shards_mut(&mut self) -> &mut [Shard] {
        &mut self.shards
    }

    /// Frames until the next spawn
    pub fn cooldown(&self) -> i32 {
        self.cooldown
    }

    /// Override the current cooldown (pins the next spawn frame)
    pub fn set_cooldown(&mut self, frames: i32) {
        self.cooldown = frames;
    }

    /// Frames simulated so far
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Advance one frame: maybe spawn, then move and prune everything
    pub fn update(&mut self) {
        self.frame += 1;
        self.cooldown -= 1;

        if self.cooldown <= 0 {
            self.spawn_one();
            self.reset_cooldown();
        }

        advance_and_prune(&mut self.obstacles);
        advance_and_prune(&mut self.shards);
    }

    pub fn draw(&self, batch: &mut ShapeBatch) {
        for obstacle in &self.obstacles {
            obstacle.draw(batch);
        }
        for shard in &self.shards {
            shard.draw(batch);
        }
    }

    /// Drop every live entity
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.shards.clear();
    }

    fn spawn_one(&mut self) {
        if self.rng.random::<f64>() < self.shard_chance {
            self.spawn_shard();
        } else {
            self.spawn_obstacle();
        }
    }

    fn spawn_obstacle(&mut self) {
        let w = lerp(36.0, 72.0, self.rng.random());
        let h = lerp(20.0, 40.0, self.rng.random());
        let x = self.rng.random::<f32>() * (self.world.x - w).max(0.0);
        let speed = self.base_speed + lerp(0.0, 3.0, difficulty_factor(self.frame));

        self.obstacles.push(Obstacle::new(
            Vec2::new(x, -h),
            Vec2::new(w, h),
            speed,
            self.world.y,
        ));
    }

    fn spawn_shard(&mut self) {
        let w = lerp(20.0, 28.0, self.rng.random());
        let h = lerp(12.0, 18.0, self.rng.random());
        let x = self.rng.random::<f32>() * (self.world.x - w).max(0.0);
        let difficulty = difficulty_factor(self.frame);
        let speed = self.base_speed * 0.55 + lerp(0.0, 1.2, difficulty);
        let score = 5 + lerp(0.0, 10.0, difficulty).floor() as u32;

        self.shards.push(Shard::new(
            Vec2::new(x, -h),
            Vec2::new(w, h),
            speed,
            score,
            self.world.y,
        ));
    }

    fn reset_cooldown(&mut self) {
        let jitter = self.rng.random_range(-JITTER..=JITTER);
        self.cooldown = cooldown_interval(self.base_interval, self.frame, jitter);
    }

    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    #[cfg(test)]
    pub(crate) fn push_shard(&mut self, shard: Shard) {
        self.shards.push(shard);
    }
}

/// Step every entity once and drop the ones that died
fn advance_and_prune<T: Drifting>(entities: &mut Vec<T>) {
    entities.retain_mut(|entity| {
        entity.advance();
        entity.is_alive()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> Vec2 {
        Vec2::new(960.0, 540.0)
    }

    #[test]
    fn test_first_spawn_after_pinned_cooldown() {
        let mut spawner = Spawner::with_seed(world(), 50, 3.5, 0.0, 42);
        spawner.set_cooldown(50);

        for _ in 0..49 {
            spawner.update();
        }
        assert!(spawner.obstacles().is_empty());

        spawner.update();
        assert_eq!(spawner.obstacles().len(), 1);
        assert!(spawner.shards().is_empty());
        assert!(spawner.cooldown() >= 46);
    }

    #[test]
    fn test_full_shard_chance_spawns_only_shards() {
        let mut spawner = Spawner::with_seed(world(), 10, 3.5, 1.0, 7);
        for _ in 0..200 {
            spawner.update();
        }
        assert!(spawner.obstacles().is_empty());
        assert!(!spawner.shards().is_empty());
    }

    #[test]
    fn test_config_is_clamped() {
        let spawner = Spawner::with_seed(world(), 1, 3.5, 4.0, 7);
        assert_eq!(spawner.base_interval, MIN_BASE_INTERVAL);
        assert_eq!(spawner.shard_chance, 1.0);
    }

    #[test]
    fn test_spawned_obstacle_geometry() {
        let mut spawner = Spawner::with_seed(world(), 10, 3.5, 0.0, 99);
        spawner.set_cooldown(1);
        spawner.update();

        let obstacle = &spawner.obstacles()[0];
        let hitbox = obstacle.hitbox();
        assert!((36.0..=72.0).contains(&hitbox.size.x));
        assert!((20.0..=40.0).contains(&hitbox.size.y));
        assert!(hitbox.min.x >= 0.0 && hitbox.min.x <= 960.0 - hitbox.size.x);
        // Spawned at -h, then advanced once in the same update
        assert!((hitbox.min.y - (-hitbox.size.y + obstacle.speed())).abs() < 1e-4);
        // Frame 1: the ramp has barely started
        assert!((obstacle.speed() - 3.5).abs() < 0.01);
    }

    #[test]
    fn test_shard_value_follows_difficulty() {
        let mut spawner = Spawner::with_seed(world(), 10, 4.0, 1.0, 3);
        spawner.set_cooldown(1);
        spawner.update();
        assert_eq!(spawner.shards()[0].score_value(), 5);
        assert!((spawner.shards()[0].speed() - 2.2).abs() < 0.01);

        spawner.clear();
        spawner.frame = 4000;
        spawner.set_cooldown(1);
        spawner.update();
        assert_eq!(spawner.shards()[0].score_value(), 15);
        assert!((spawner.shards()[0].speed() - 3.4).abs() < 0.01);
    }

    #[test]
    fn test_interval_shrinks_with_time() {
        assert_eq!(cooldown_interval(50, 0, 0), 50);
        // 100 seconds in: 50 - 10
        assert_eq!(cooldown_interval(50, 6000, 0), 40);
        // Long runs bottom out at MIN_INTERVAL
        assert_eq!(cooldown_interval(50, 60 * 10_000, 0), MIN_INTERVAL);
        assert_eq!(cooldown_interval(50, 60 * 10_000, -JITTER), 12);
    }

    #[test]
    fn test_difficulty_factor_saturates() {
        assert_eq!(difficulty_factor(0), 0.0);
        assert!((difficulty_factor(1800) - 0.5).abs() < 1e-6);
        assert_eq!(difficulty_factor(3600), 1.0);
        assert_eq!(difficulty_factor(100_000), 1.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Spawner::with_seed(world(), 20, 3.5, 0.25, 1234);
        let mut b = Spawner::with_seed(world(), 20, 3.5, 0.25, 1234);
        for _ in 0..500 {
            a.update();
            b.update();
        }
        assert_eq!(a.obstacles().len(), b.obstacles().len());
        assert_eq!(a.shards().len(), b.shards().len());
        for (oa, ob) in a.obstacles().iter().zip(b.obstacles()) {
            assert_eq!(oa.position(), ob.position());
        }
    }

    proptest! {
        #[test]
        fn prop_cooldown_floor(
            base in MIN_BASE_INTERVAL..200,
            frame in 0u32..10_000_000,
            jitter in -JITTER..=JITTER,
        ) {
            prop_assert!(cooldown_interval(base, frame, jitter) >= MIN_COOLDOWN);
        }

        #[test]
        fn prop_reset_cooldown_floor(seed in any::<u64>(), frames in 0u32..2000) {
            let mut spawner = Spawner::with_seed(world(), 10, 3.5, 0.5, seed);
            prop_assert!(spawner.cooldown() >= MIN_COOLDOWN);
            for _ in 0..frames {
                let before = spawner.cooldown();
                spawner.update();
                if before <= 1 {
                    prop_assert!(spawner.cooldown() >= MIN_COOLDOWN);
                }
            }
        }

        #[test]
        fn prop_no_dead_or_fallen_entities_after_update(
            seed in any::<u64>(),
            frames in 1u32..1500,
        ) {
            let mut spawner = Spawner::with_seed(world(), 10, 6.0, 0.4, seed);
            for _ in 0..frames {
                spawner.update();
                for o in spawner.obstacles() {
                    prop_assert!(o.is_alive());
                    prop_assert!(o.position().y <= 540.0);
                }
                for s in spawner.shards() {
                    prop_assert!(s.is_alive());
                    prop_assert!(s.position().y <= 540.0);
                }
            }
        }
    }
}
