//! Lifecycle state, the read-only frame handed to the renderer, and the
//! renderer-side observer trait.

use std::fmt;

use serde::Serialize;

use crate::grid::{Direction, Position};

/// Discriminant values are what the browser shell receives; do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    Idle = 0,
    Playing = 1,
    Paused = 2,
    Over = 3,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
            Self::Over => write!(f, "over"),
        }
    }
}

/// Immutable copy of everything a renderer needs for one frame.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Snapshot {
    /// Head first.
    pub snake: Vec<Position>,
    /// `None` only while idle, or when the snake covers the whole board.
    pub food: Option<Position>,
    pub score: u32,
    pub state: GameState,
    pub direction: Direction,
    pub speed_ms: u32,
    pub high_score: u32,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        Overlay::for_state(self.state, self.score)
    }
}

/// What to draw over the board for a given state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Overlay {
    /// Empty board with the "press start" prompt.
    Prompt,
    Paused,
    GameOver { score: u32 },
}

impl Overlay {
    #[must_use]
    pub fn for_state(state: GameState, score: u32) -> Option<Self> {
        match state {
            GameState::Idle => Some(Self::Prompt),
            GameState::Paused => Some(Self::Paused),
            GameState::Over => Some(Self::GameOver { score }),
            GameState::Playing => None,
        }
    }
}

/// Receives a snapshot after every step and on pause, game over and idle
/// transitions. Implementations must not call back into the core.
pub trait RenderSink {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Keeps the most recent snapshot and a dirty flag for hosts that pull frames
/// on their own schedule.
#[derive(Debug, Default)]
pub struct LatestFrame {
    frame: Option<Snapshot>,
    dirty: bool,
}

impl LatestFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frame(&self) -> Option<&Snapshot> {
        self.frame.as_ref()
    }

    /// Returns whether a new frame arrived since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl RenderSink for LatestFrame {
    fn present(&mut self, snapshot: &Snapshot) {
        self.frame = Some(snapshot.clone());
        self.dirty = true;
    }
}

/// Records every presented frame. Useful for replay and tests.
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<Snapshot>,
}

impl FrameLog {
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.frames.last()
    }
}

impl RenderSink for FrameLog {
    fn present(&mut self, snapshot: &Snapshot) {
        self.frames.push(snapshot.clone());
    }
}
