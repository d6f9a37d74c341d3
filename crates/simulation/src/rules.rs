//! Game constants and the [`Rules`] value that carries them.

use serde::Deserialize;

use crate::error::RulesError;
use crate::grid::Grid;

/// Cells per side of the square board.
pub const GRID_COUNT: i32 = 20;

/// Tick interval at the start of every run.
pub const BASE_SPEED_MS: u32 = 150;

/// Interval reduction applied at each speed-up.
pub const SPEED_STEP_MS: u32 = 10;

/// The interval never drops below this.
pub const SPEED_FLOOR_MS: u32 = 60;

/// Score gained per food item.
pub const FOOD_REWARD: u32 = 10;

/// A speed-up happens each time the score reaches a multiple of this
/// (every 5 food items with the default reward).
pub const SPEEDUP_EVERY: u32 = 50;

/// Segments in the starting snake.
pub const INITIAL_LENGTH: usize = 3;

/// Largest board a [`Rules`] override may ask for.
pub const MAX_GRID_COUNT: i32 = 1024;

/// Largest per-food reward a [`Rules`] override may ask for. Together with
/// [`MAX_GRID_COUNT`] this keeps a full-board score well inside `u32`.
pub const MAX_FOOD_REWARD: u32 = 1000;

/// Tunable game parameters. `Default` is the shipped game; other values exist
/// for tests and hosts that want a different board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub grid_count: i32,
    pub base_speed_ms: u32,
    pub speed_step_ms: u32,
    pub speed_floor_ms: u32,
    pub food_reward: u32,
    pub speedup_every: u32,
    pub initial_length: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid_count: GRID_COUNT,
            base_speed_ms: BASE_SPEED_MS,
            speed_step_ms: SPEED_STEP_MS,
            speed_floor_ms: SPEED_FLOOR_MS,
            food_reward: FOOD_REWARD,
            speedup_every: SPEEDUP_EVERY,
            initial_length: INITIAL_LENGTH,
        }
    }
}

impl Rules {
    /// Parse a partial JSON override; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_json::from_str(raw).map_err(|e| RulesError::Parse(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// The starting snake is laid out horizontally, head at the centre, tail
    /// towards the left edge, and needs one free cell in front of it.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.base_speed_ms == 0 {
            return Err(RulesError::Zero("base_speed_ms"));
        }
        if self.speed_step_ms == 0 {
            return Err(RulesError::Zero("speed_step_ms"));
        }
        if self.speed_floor_ms == 0 {
            return Err(RulesError::Zero("speed_floor_ms"));
        }
        if self.food_reward == 0 {
            return Err(RulesError::Zero("food_reward"));
        }
        if self.speedup_every == 0 {
            return Err(RulesError::Zero("speedup_every"));
        }
        if self.initial_length == 0 {
            return Err(RulesError::Zero("initial_length"));
        }
        if self.food_reward > MAX_FOOD_REWARD {
            return Err(RulesError::RewardTooLarge {
                reward: self.food_reward,
                max: MAX_FOOD_REWARD,
            });
        }
        if self.grid_count > MAX_GRID_COUNT {
            return Err(RulesError::GridTooLarge {
                grid_count: self.grid_count,
                max: MAX_GRID_COUNT,
            });
        }
        if self.speed_floor_ms > self.base_speed_ms {
            return Err(RulesError::FloorAboveBase {
                floor_ms: self.speed_floor_ms,
                base_ms: self.base_speed_ms,
            });
        }
        let centre = self.grid_count / 2;
        let fits_behind = self.initial_length <= (centre + 1).max(0) as usize;
        let room_ahead = centre + 1 < self.grid_count;
        if self.grid_count <= 0 || !fits_behind || !room_ahead {
            return Err(RulesError::GridTooSmall {
                grid_count: self.grid_count,
                initial_length: self.initial_length,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_count)
    }

    /// Interval after a food item brought the score to `score`, given the
    /// interval in force before it.
    #[must_use]
    pub fn speed_after(&self, score: u32, current_ms: u32) -> u32 {
        if score > 0 && score % self.speedup_every == 0 && current_ms > self.speed_floor_ms {
            current_ms
                .saturating_sub(self.speed_step_ms)
                .max(self.speed_floor_ms)
        } else {
            current_ms
        }
    }
}
