//! Title screen

use glam::Vec2;

use super::{GameMode, ModeContext, Transition, advance_pulse};
use crate::platform::Key;
use crate::renderer::{ShapeBatch, colors};

const PULSE_STEP: f32 = 0.06;
const RING_COUNT: u32 = 5;

#[derive(Debug, Default)]
pub struct MenuMode {
    pulse: f32,
    best: u64,
    world: Vec2,
}

impl MenuMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radius of ring `i` at the current pulse
    fn ring_radius(&self, i: u32) -> f32 {
        110.0 + 18.0 * self.pulse.sin() + 4.0 * i as f32
    }
}

impl GameMode for MenuMode {
    fn name(&self) -> &'static str {
        "Menu"
    }

    fn enter(&mut self, ctx: &mut ModeContext<'_>) {
        self.world = ctx.world;
        self.best = ctx.store.load();
    }

    fn handle_input(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        if ctx.input.is_just_pressed(Key::Enter) {
            Some(Transition::Start)
        } else if ctx.input.is_just_pressed(Key::Escape) {
            Some(Transition::Quit)
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
        for i in 0..RING_COUNT {
            let r = self.ring_radius(i);
            batch.ring(center, r - 1.0, r + 1.0, colors::CYAN, 64);
        }

        let best = format!("BEST: {}", self.best);
        let bottom = self.world.y;
        batch.text_centered("NEON DRIFT", center.x, center.y - 14.0, 4.0, colors::WHITE);
        batch.text_centered(&best, center.x, 48.0, 2.0, colors::YELLOW);
        batch.text_centered("PRESS ENTER TO PLAY", center.x, bottom - 110.0, 2.0, colors::WHITE);
        batch.text_centered("PRESS ESC TO QUIT", center.x, bottom - 78.0, 2.0, colors::GREY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::Harness;

    #[test]
    fn test_enter_loads_best_score() {
        let mut harness = Harness::new();
        harness.store.save(321);

        let mut menu = MenuMode::new();
        menu.enter(&mut harness.ctx());
        assert_eq!(menu.best, 321);
    }

    #[test]
    fn test_keys() {
        let mut harness = Harness::new();
        let mut menu = MenuMode::new();
        menu.enter(&mut harness.ctx());
        assert_eq!(menu.handle_input(&mut harness.ctx()), None);

        harness.input.key_down(Key::Enter);
        assert_eq!(menu.handle_input(&mut harness.ctx()), Some(Transition::Start));

        harness.input.end_frame();
        harness.input.key_down(Key::Escape);
        assert_eq!(menu.handle_input(&mut harness.ctx()), Some(Transition::Quit));
    }

    #[test]
    fn test_rings_pulse() {
        let mut harness = Harness::new();
        let mut menu = MenuMode::new();
        menu.enter(&mut harness.ctx());
        assert_eq!(menu.ring_radius(0), 110.0);
        assert_eq!(menu.ring_radius(4), 126.0);

        for _ in 0..10_000 {
            menu.update(&mut harness.ctx());
            assert!((0.0..std::f32::consts::TAU).contains(&menu.pulse));
        }

        let mut batch = ShapeBatch::new();
        menu.draw(&mut batch);
        assert!(!batch.is_empty());
    }
}
