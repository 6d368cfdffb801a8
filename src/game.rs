//! Top-level game object
//!
//! Owns the mode state machine and the services modes borrow. The platform
//! layer feeds it one simulation step at a time and draws it once per frame.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::SoundBank;
use crate::modes::{
    GameMode, GameOverMode, MenuMode, ModeContext, PauseMode, PlayMode, StateMachine, Transition,
};
use crate::persistence::BestScoreStore;
use crate::platform::{FrameClock, InputState};
use crate::renderer::ShapeBatch;

/// Fixes the run seeds, for reproducible sessions
pub const SEED_ENV: &str = "NEON_DRIFT_SEED";

/// Seed from `NEON_DRIFT_SEED`, else the wall clock
pub fn seed_from_env() -> u64 {
    if let Ok(raw) = std::env::var(SEED_ENV) {
        match raw.trim().parse() {
            Ok(seed) => return seed,
            Err(e) => log::warn!("Ignoring {SEED_ENV}={raw:?}: {e}"),
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

struct Services {
    store: BestScoreStore,
    world: Vec2,
    seeds: Pcg32,
}

impl Services {
    fn context<'a>(
        &'a mut self,
        input: &'a InputState,
        audio: &'a mut SoundBank,
    ) -> ModeContext<'a> {
        ModeContext {
            input,
            audio,
            store: &self.store,
            world: self.world,
            seeds: &mut self.seeds,
        }
    }
}

pub struct Game {
    machine: StateMachine,
    services: Services,
    quit: bool,
}

impl Game {
    /// Build the game and enter the menu
    pub fn new(
        store: BestScoreStore,
        world: Vec2,
        seed: u64,
        input: &InputState,
        audio: &mut SoundBank,
    ) -> Self {
        log::info!("Game seed {seed}");
        let mut game = Self {
            machine: StateMachine::new(),
            services: Services {
                store,
                world,
                seeds: Pcg32::seed_from_u64(seed),
            },
            quit: false,
        };
        game.apply(Transition::Menu, input, audio);
        game
    }

    /// One fixed simulation step: input, then update. A transition from
    /// input is applied before the (possibly new) mode updates.
    pub fn step(&mut self, input: &InputState, audio: &mut SoundBank) {
        if self.quit {
            return;
        }

        let requested = self
            .machine
            .handle_input(&mut self.services.context(input, audio));
        if let Some(transition) = requested {
            self.apply(transition, input, audio);
        }
        if self.quit {
            return;
        }

        let requested = self.machine.update(&mut self.services.context(input, audio));
        if let Some(transition) = requested {
            self.apply(transition, input, audio);
        }
    }

    /// Run every step `clock` has due. Each step consumes the edge presses
    /// it saw, so a mode entered mid-frame never reacts to the key that
    /// entered it. Stops early once quit is requested.
    pub fn run_steps(
        &mut self,
        clock: &mut FrameClock,
        input: &mut InputState,
        audio: &mut SoundBank,
    ) -> u32 {
        let mut steps = 0;
        while !self.quit && clock.should_step() {
            self.step(input, audio);
            audio.update();
            input.end_frame();
            steps += 1;
        }
        steps
    }

    pub fn draw(&self, batch: &mut ShapeBatch) {
        self.machine.draw(batch);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn mode_name(&self) -> Option<&'static str> {
        self.machine.current_name()
    }

    fn apply(&mut self, transition: Transition, input: &InputState, audio: &mut SoundBank) {
        let next: Box<dyn GameMode> = match transition {
            Transition::Start => Box::new(PlayMode::new()),
            Transition::Menu => Box::new(MenuMode::new()),
            Transition::Pause => Box::new(PauseMode::new()),
            Transition::GameOver(score) => Box::new(GameOverMode::new(score)),
            Transition::Quit => {
                log::info!("Quit requested from {:?}", self.mode_name());
                self.quit = true;
                return;
            }
        };
        let mut ctx = self.services.context(input, audio);
        self.machine.change_state(next, &mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SIM_DT, WORLD_HEIGHT, WORLD_WIDTH};
    use crate::platform::Key;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Fixture {
        input: InputState,
        audio: SoundBank,
        game: Game,
    }

    impl Fixture {
        fn new() -> Self {
            static COUNTER: AtomicU32 = AtomicU32::new(0);
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let dir = std::env::temp_dir().join(format!(
                "neon-drift-game-{}-{n}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);

            let input = InputState::new();
            let mut audio = SoundBank::new();
            let game = Game::new(
                BestScoreStore::new(dir.join("bestscore.json")),
                Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
                42,
                &input,
                &mut audio,
            );
            Self { input, audio, game }
        }

        fn press(&mut self, key: Key) {
            self.input.key_down(key);
            self.game.step(&self.input, &mut self.audio);
            self.input.key_up(key);
            self.input.end_frame();
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            if let Some(dir) = self.game.services.store.path().parent() {
                let _ = std::fs::remove_dir_all(dir);
            }
        }
    }

    #[test]
    fn test_starts_in_menu() {
        let f = Fixture::new();
        assert_eq!(f.game.mode_name(), Some("Menu"));
        assert!(!f.game.should_quit());
    }

    #[test]
    fn test_menu_play_pause_cycle() {
        let mut f = Fixture::new();
        f.press(Key::Enter);
        assert_eq!(f.game.mode_name(), Some("Play"));
        f.press(Key::P);
        assert_eq!(f.game.mode_name(), Some("Pause"));
        f.press(Key::Escape);
        assert_eq!(f.game.mode_name(), Some("Menu"));
        assert!(!f.game.should_quit());
    }

    #[test]
    fn test_escape_from_menu_quits() {
        let mut f = Fixture::new();
        f.press(Key::Escape);
        assert!(f.game.should_quit());
        // The mode stays put; only the flag changes
        assert_eq!(f.game.mode_name(), Some("Menu"));
    }

    #[test]
    fn test_no_steps_after_quit() {
        let mut f = Fixture::new();
        f.game.request_quit();
        f.press(Key::Enter);
        assert_eq!(f.game.mode_name(), Some("Menu"));
    }

    #[test]
    fn test_multi_step_frame_consumes_press_once() {
        let mut f = Fixture::new();
        f.game.apply(Transition::GameOver(5), &f.input, &mut f.audio);
        assert_eq!(f.game.mode_name(), Some("GameOver"));

        let mut clock = FrameClock::new();
        clock.advance(SIM_DT * 2.5);
        f.input.key_down(Key::Escape);
        let steps = f.game.run_steps(&mut clock, &mut f.input, &mut f.audio);

        assert_eq!(steps, 2);
        assert_eq!(f.game.mode_name(), Some("Menu"));
        assert!(!f.game.should_quit());
    }

    #[test]
    fn test_press_kept_across_zero_step_frame() {
        let mut f = Fixture::new();
        let mut clock = FrameClock::new();
        f.input.key_down(Key::Enter);

        clock.advance(SIM_DT * 0.5);
        assert_eq!(f.game.run_steps(&mut clock, &mut f.input, &mut f.audio), 0);
        assert_eq!(f.game.mode_name(), Some("Menu"));

        clock.advance(SIM_DT * 0.6);
        assert_eq!(f.game.run_steps(&mut clock, &mut f.input, &mut f.audio), 1);
        assert_eq!(f.game.mode_name(), Some("Play"));
    }

    #[test]
    fn test_run_steps_stops_at_quit() {
        let mut f = Fixture::new();
        let mut clock = FrameClock::new();
        clock.advance(SIM_DT * 3.5);
        f.input.key_down(Key::Escape);

        assert_eq!(f.game.run_steps(&mut clock, &mut f.input, &mut f.audio), 1);
        assert!(f.game.should_quit());
    }

    #[test]
    fn test_draw_follows_mode() {
        let mut f = Fixture::new();
        let mut batch = ShapeBatch::new();
        f.game.draw(&mut batch);
        assert!(!batch.is_empty());

        f.press(Key::Enter);
        batch.clear();
        f.game.draw(&mut batch);
        assert!(!batch.is_empty());
    }
}
