//! Pause overlay
//!
//! The run is not kept: resuming starts a fresh Play session.

use glam::Vec2;

use super::{GameMode, ModeContext, Transition, advance_pulse};
use crate::platform::Key;
use crate::renderer::{ShapeBatch, colors};

const PULSE_STEP: f32 = 0.05;
const PANEL_SIZE: Vec2 = Vec2::new(360.0, 120.0);

#[derive(Debug, Default)]
pub struct PauseMode {
    pulse: f32,
    world: Vec2,
}

impl PauseMode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameMode for PauseMode {
    fn name(&self) -> &'static str {
        "Pause"
    }

    fn enter(&mut self, ctx: &mut ModeContext<'_>) {
        self.world = ctx.world;
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

    fn update(&mut self, _ctx: &mut ModeContext<'_>) -> Option<Transition> {
        self.pulse = advance_pulse(self.pulse, PULSE_STEP);
        None
    }

    fn draw(&self, batch: &mut ShapeBatch) {
        let center = self.world / 2.0;
        let panel = center - PANEL_SIZE / 2.0;

        batch.fill_rect(0.0, 0.0, self.world.x, self.world.y, colors::DIM);
        batch.stroke_rect(panel.x, panel.y, PANEL_SIZE.x, PANEL_SIZE.y, 2.0, colors::CYAN);

        let bob = 4.0 * self.pulse.sin();
        batch.text_centered("PAUSED", center.x, panel.y + 24.0 + bob, 3.0, colors::WHITE);
        batch.text_centered("ENTER: RESUME", center.x, panel.y + 72.0, 1.0, colors::GREY);
        batch.text_centered("ESC: MENU", center.x, panel.y + 88.0, 1.0, colors::GREY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::Harness;

    #[test]
    fn test_keys() {
        let mut harness = Harness::new();
        let mut pause = PauseMode::new();
        pause.enter(&mut harness.ctx());
        assert_eq!(pause.handle_input(&mut harness.ctx()), None);

        harness.input.key_down(Key::Enter);
        assert_eq!(pause.handle_input(&mut harness.ctx()), Some(Transition::Start));

        harness.input.end_frame();
        harness.input.key_down(Key::Escape);
        assert_eq!(pause.handle_input(&mut harness.ctx()), Some(Transition::Menu));
    }

    #[test]
    fn test_draws_overlay_centred() {
        let mut harness = Harness::new();
        let mut pause = PauseMode::new();
        pause.enter(&mut harness.ctx());
        pause.update(&mut harness.ctx());

        let mut batch = ShapeBatch::new();
        pause.draw(&mut batch);
        // First quad is the full-screen dim
        let first = &batch.vertices()[..6];
        assert!(first.iter().all(|v| v.color == colors::DIM));
        // Outline starts at (300, 210)
        assert_eq!(batch.vertices()[6].position, [300.0, 210.0]);
    }
}
