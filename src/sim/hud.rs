//! Score keeping and the in-game score panel

use crate::renderer::ShapeBatch;
use crate::renderer::colors;

/// Heads-up display: a time-based score plus pickup credits
#[derive(Debug, Clone)]
pub struct Hud {
    frames: u64,
    score: u64,
    frames_per_point: u32,
}

impl Hud {
    /// `frames_per_point` below 1 is treated as 1
    pub fn new(frames_per_point: u32) -> Self {
        Self {
            frames: 0,
            score: 0,
            frames_per_point: frames_per_point.max(1),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Credit points from a pickup. Negative amounts are ignored.
    pub fn add_score(&mut self, points: i64) {
        if let Ok(points) = u64::try_from(points) {
            self.score = self.score.saturating_add(points);
        }
    }

    /// One point every `frames_per_point` frames
    pub fn update(&mut self) {
        self.frames += 1;
        if self.frames % u64::from(self.frames_per_point) == 0 {
            self.score += 1;
        }
    }

    pub fn draw(&self, batch: &mut ShapeBatch) {
        batch.fill_rect(8.0, 8.0, 180.0, 54.0, colors::PANEL);
        batch.text(&format!("SCORE: {}", self.score), 16.0, 20.0, colors::WHITE);
        batch.text("ESC: QUIT  P: PAUSE", 16.0, 44.0, colors::GREY);
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(crate::consts::FRAMES_PER_POINT)
    }
}
