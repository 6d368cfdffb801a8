//! Game-mode state machine
//!
//! Exactly one mode is active at a time. Modes never reach back into the
//! game: `handle_input` and `update` return a [`Transition`] and the owner
//! applies it once the call has returned.

pub mod game_over;
pub mod menu;
pub mod pause;
pub mod play;

pub use game_over::GameOverMode;
pub use menu::MenuMode;
pub use pause::PauseMode;
pub use play::PlayMode;

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::audio::SoundBank;
use crate::persistence::BestScoreStore;
use crate::platform::InputState;
use crate::renderer::ShapeBatch;

/// Requested change, applied by the owner of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Begin a fresh Play session
    Start,
    Menu,
    Pause,
    /// Run ended with this score
    GameOver(u64),
    /// Not a mode change: raises the process-level quit flag
    Quit,
}

/// Collaborators a mode may use while it is active
pub struct ModeContext<'a> {
    pub input: &'a InputState,
    pub audio: &'a mut SoundBank,
    pub store: &'a BestScoreStore,
    pub world: Vec2,
    /// Seeds handed to each new Play session
    pub seeds: &'a mut Pcg32,
}

/// Enter / HandleInput / Update / Draw / Exit lifecycle shared by all modes
pub trait GameMode {
    fn name(&self) -> &'static str;

    fn enter(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn handle_input(&mut self, _ctx: &mut ModeContext<'_>) -> Option<Transition> {
        None
    }

    fn update(&mut self, _ctx: &mut ModeContext<'_>) -> Option<Transition> {
        None
    }

    fn draw(&self, batch: &mut ShapeBatch);

    /// Called once, right before the mode is dropped
    fn exit(&mut self) {}
}

/// Holds the active mode, if any
#[derive(Default)]
pub struct StateMachine {
    current: Option<Box<dyn GameMode>>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|mode| mode.name())
    }

    /// Exit and drop the current mode, then enter `next`. Any mode may follow
    /// any other.
    pub fn change_state(&mut self, mut next: Box<dyn GameMode>, ctx: &mut ModeContext<'_>) {
        self.clear();
        log::info!("Entering {} mode", next.name());
        next.enter(ctx);
        self.current = Some(next);
    }

    pub fn handle_input(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        self.current.as_mut()?.handle_input(ctx)
    }

    pub fn update(&mut self, ctx: &mut ModeContext<'_>) -> Option<Transition> {
        self.current.as_mut()?.update(ctx)
    }

    pub fn draw(&self, batch: &mut ShapeBatch) {
        if let Some(mode) = &self.current {
            mode.draw(batch);
        }
    }

    /// Exit and drop the current mode, leaving the machine empty
    pub fn clear(&mut self) {
        if let Some(mut old) = self.current.take() {
            old.exit();
            log::debug!("Left {} mode", old.name());
        }
    }
}

impl Drop for StateMachine {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Advance a pulse phase, wrapping at 2π
fn advance_pulse(pulse: f32, step: f32) -> f32 {
    (pulse + step) % std::f32::consts::TAU
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Owns everything a `ModeContext` borrows
    pub struct Harness {
        pub input: InputState,
        pub audio: SoundBank,
        pub store: BestScoreStore,
        pub seeds: Pcg32,
    }

    impl Harness {
        pub fn new() -> Self {
            static COUNTER: AtomicU32 = AtomicU32::new(0);
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let dir = std::env::temp_dir().join(format!(
                "neon-drift-modes-{}-{n}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            Self {
                input: InputState::new(),
                audio: SoundBank::new(),
                store: BestScoreStore::new(dir.join("bestscore.json")),
                seeds: Pcg32::seed_from_u64(7),
            }
        }

        pub fn ctx(&mut self) -> ModeContext<'_> {
            ModeContext {
                input: &self.input,
                audio: &mut self.audio,
                store: &self.store,
                world: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
                seeds: &mut self.seeds,
            }
        }
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            if let Some(dir) = self.store.path().parent() {
                let _ = std::fs::remove_dir_all(dir);
            }
        }
    }
}
