//! The actual run: player, spawner, score and collisions

use glam::Vec2;
use rand::Rng;

use super::{GameMode, ModeContext, Transition};
use crate::consts::{
    FRAMES_PER_POINT, GRID_STEP, LANE_WIDTH, SCROLL_SPEED, SHARD_CHANCE, SPAWN_BASE_SPEED,
    SPAWN_INTERVAL,
};
use crate::platform::Key;
use crate::renderer::{ShapeBatch, colors};
use crate::sim::{CollisionSystem, Entity, Hud, Player, Spawner};

/// Background track looped for the whole run
pub const MUSIC_TRACK: &str = "bgm";

/// Everything a run owns; built on enter
struct Session {
    player: Player,
    spawner: Spawner,
    hud: Hud,
    collisions: CollisionSystem,
    /// Vertical offset of the background grid, in `[0, GRID_STEP)`
    scroll: f32,
    world: Vec2,
}

#[derive(Default)]
pub struct PlayMode {
    session: Option<Session>,
}

impl PlayMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current score, if the run has started
    pub fn score(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.hud.score())
    }
}

impl GameMode for PlayMode {
    fn name(&self) -> &'static str {
        "Play"
    }

    fn enter(&mut self, ctx: &mut ModeContext<'_>) {
        let world = ctx.world;
        let seed: u64 = ctx.seeds.random();
        log::debug!("Run seed {seed}");

        self.session = Some(Session {
            player: Player::new(Player::spawn_point(world), world),
            spawner: Spawner::with_seed(
                world,
                SPAWN_INTERVAL,
                SPAWN_BASE_SPEED,
                SHARD_CHANCE,
                seed,
            ),
            hud: Hud::new(FRAMES_PER_POINT),
            collisions: CollisionSystem::new(),
            scroll: 0.0,
            world,
        });

        if ctx.audio.has_music(MUSIC_TRACK) {
            ctx.audio.loop_music(MUSIC_TRACK);
        }
        log::info!("Arrow keys to move, P to pause, Esc to quit");
    }

    fn handle_input(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        if ctx.input.is_just_pressed(Key::Escape) {
            Some(Transition::Quit)
        } else if ctx.input.is_just_pressed(Key::P) {
            Some(Transition::Pause)
        } else {
            None
        }
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        let s = self.session.as_mut()?;

        s.player.update(ctx.input);
        s.spawner.update();
        s.hud.update();
        s.collisions
            .update(&s.player, &mut s.spawner, &mut s.hud, ctx.audio);

        if s.collisions.player_collided() {
            log::info!("Crashed with score {}", s.hud.score());
            return Some(Transition::GameOver(s.hud.score()));
        }

        s.scroll = (s.scroll + SCROLL_SPEED) % GRID_STEP;
        None
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        let Some(s) = &self.session else { return };
        draw_background(batch, s.world, s.scroll);
        s.spawner.draw(batch);
        s.player.draw(batch);
        s.hud.draw(batch);
    }

    fn exit(&mut self) {
        if let Some(s) = self.session.take() {
            log::debug!("Run ended after {} frames", s.spawner.frame());
        }
    }
}

/// Scrolling grid under vertical lane markers
fn draw_background(batch: &mut ShapeBatch, world: Vec2, scroll: f32) {
    let mut y = scroll - GRID_STEP;
    while y < world.y {
        batch.fill_rect(0.0, y, world.x, 1.0, colors::GRID);
        y += GRID_STEP;
    }

    let mut x = LANE_WIDTH;
    while x < world.x {
        batch.fill_rect(x - 2.0, 0.0, 1.0, world.y, colors::LANE_EDGE);
        batch.fill_rect(x, 0.0, 1.0, world.y, colors::LANE_CENTER);
        batch.fill_rect(x + 2.0, 0.0, 1.0, world.y, colors::LANE_EDGE);
        x += LANE_WIDTH;
    }
}
