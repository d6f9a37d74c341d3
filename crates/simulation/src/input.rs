//! Input buffer and raw-intent translation.
//!
//! Exactly one pending direction is held between ticks. Every intent is
//! checked against the direction committed by the last tick, not against the
//! previous pending value, so several inputs within one tick collapse to the
//! last valid one and none of them can reverse the snake.

use crate::grid::Direction;
use crate::snapshot::GameState;

/// Single-slot buffer of the direction the next tick will apply.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InputBuffer {
    pending: Direction,
}

impl InputBuffer {
    #[must_use]
    pub fn new(initial: Direction) -> Self {
        Self { pending: initial }
    }

    #[must_use]
    pub fn pending(&self) -> Direction {
        self.pending
    }

    /// Forget any buffered intent and follow `direction`.
    pub fn reset(&mut self, direction: Direction) {
        self.pending = direction;
    }

    /// Offer an intent. Returns whether it was accepted.
    ///
    /// Dropped silently when the game is not running or when the intent is the
    /// exact reverse of `committed`.
    pub fn offer(&mut self, intent: Direction, committed: Direction, state: GameState) -> bool {
        if state != GameState::Playing || intent.is_opposite(committed) {
            return false;
        }
        self.pending = intent;
        true
    }
}

impl Direction {
    /// Arrow keys and WASD, case-insensitive for the letters.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    /// Dominant axis of a touch drag. Drags shorter than `min_distance` on
    /// both axes are ignored; exact diagonals resolve to the horizontal axis.
    #[must_use]
    pub fn from_swipe(dx: f64, dy: f64, min_distance: f64) -> Option<Self> {
        if dx.abs() < min_distance && dy.abs() < min_distance {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if dy > 0.0 { Self::Down } else { Self::Up })
        }
    }
}
