//! End-of-run summary and best score bookkeeping

use glam::Vec2;

use super::{GameMode, ModeContext, Transition};
use crate::platform::Key;
use crate::renderer::{ShapeBatch, colors};

pub const GAME_OVER_CUE: &str = "gameover";
pub const NEW_BEST_CUE: &str = "newbest";
const EFFECT_FADE_MS: u32 = 300;

#[derive(Debug)]
pub struct GameOverMode {
    final_score: u64,
    best: u64,
    new_best: bool,
    world: Vec2,
}

impl GameOverMode {
    pub fn new(final_score: u64) -> Self {
        Self {
            final_score,
            best: 0,
            new_best: false,
            world: Vec2::ZERO,
        }
    }

    pub fn is_new_best(&self) -> bool {
        self.new_best
    }
}

impl GameMode for GameOverMode {
    fn name(&self) -> &'static str {
        "GameOver"
    }

    fn enter(&mut self, ctx: &mut ModeContext<'_>) {
        self.world = ctx.world;
        ctx.audio.stop_music();
        ctx.audio.fade_out_effects(EFFECT_FADE_MS);

        self.best = ctx.store.load();
        let cue = if self.final_score > self.best {
            ctx.store
                .save(i64::try_from(self.final_score).unwrap_or(i64::MAX));
            log::info!("New best score: {} (was {})", self.final_score, self.best);
            self.best = self.final_score;
            self.new_best = true;
            NEW_BEST_CUE
        } else {
            GAME_OVER_CUE
        };

        if ctx.audio.has_sound_effect(cue) {
            ctx.audio.play_effect(cue, None, 1);
        }
    }

    fn handle_input(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        if ctx.input.is_just_pressed(Key::Enter) {
            Some(Transition::Start)
        } else if ctx.input.is_just_pressed(Key::Escape) {
            Some(Transition::Menu)
        } else {
            None
        }
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        let cx = self.world.x / 2.0;
        let score = format!("SCORE: {}", self.final_score);
        let best = format!("BEST: {}", self.best);

        batch.text_centered("GAME OVER", cx, 140.0, 4.0, colors::OBSTACLE);
        batch.text_centered(&score, cx, 220.0, 2.0, colors::WHITE);
        batch.text_centered(&best, cx, 252.0, 2.0, colors::GREY);
        if self.new_best {
            batch.text_centered("NEW BEST!", cx, 296.0, 2.0, colors::YELLOW);
        }
        batch.text_centered("ENTER: PLAY AGAIN   ESC: MENU", cx, 400.0, 1.0, colors::CYAN);
    }
}
