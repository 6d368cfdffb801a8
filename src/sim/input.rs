//! Gameplay input abstraction
//!
//! Gameplay code never queries the keyboard directly; it reads an
//! [`InputSource`] polled once per frame.

/// Four level-triggered directions plus one edge-triggered action
pub trait InputSource {
    fn left(&self) -> bool;
    fn right(&self) -> bool;
    fn up(&self) -> bool;
    fn down(&self) -> bool;
    /// True only on the frame the action key went down
    fn action(&self) -> bool;
}

/// Frozen copy of an input source for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub action: bool,
}

impl InputSnapshot {
    /// Sample every channel of `source` once
    pub fn poll(source: &(impl InputSource + ?Sized)) -> Self {
        Self {
            left: source.left(),
            right: source.right(),
            up: source.up(),
            down: source.down(),
            action: source.action(),
        }
    }
}

impl InputSource for InputSnapshot {
    fn left(&self) -> bool {
        self.left
    }

    fn right(&self) -> bool {
        self.right
    }

    fn up(&self) -> bool {
        self.up
    }

    fn down(&self) -> bool {
        self.down
    }

    fn action(&self) -> bool {
        self.action
    }
}
