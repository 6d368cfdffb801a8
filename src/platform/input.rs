//! Keyboard state with level-triggered and edge-triggered queries.
//!
//! `is_held` is true every frame a key is down. `is_just_pressed` is true
//! from the press until `end_frame`, which runs after every simulation step
//! (`Game::run_steps`). Presses on a zero-step frame are kept for the next.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::sim::InputSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    P,
    F11,
}

/// Physical key to game key; unmapped keys are ignored
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::F11 => Some(Key::F11),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Forget every key, e.g. when the window loses focus and releases
    /// would never arrive
    pub fn release_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}

/// Arrows move, Space is the action key
impl InputSource for InputState {
    fn left(&self) -> bool {
        self.is_held(Key::Left)
    }

    fn right(&self) -> bool {
        self.is_held(Key::Right)
    }

    fn up(&self) -> bool {
        self.is_held(Key::Up)
    }

    fn down(&self) -> bool {
        self.is_held(Key::Down)
    }

    fn action(&self) -> bool {
        self.is_just_pressed(Key::Space)
    }
}
