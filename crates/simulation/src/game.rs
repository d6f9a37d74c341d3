//! The snake state machine.
//!
//! One [`SimulationCore`] exists per game session. It owns the board state and
//! its three collaborators: the [`Scheduler`] it arms and cancels, the
//! [`RenderSink`] it pushes snapshots to, and the [`ScoreStore`] it reports
//! finished runs to. Collaborators never mutate the core.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::error::RulesError;
use crate::food::FoodSpawner;
use crate::grid::{Direction, Grid, Position};
use crate::input::InputBuffer;
use crate::rules::Rules;
use crate::scheduler::Scheduler;
use crate::snapshot::{GameState, RenderSink, Snapshot};
use crate::store::ScoreStore;

/// Direction of the starting snake, and of an idle board.
pub const START_DIRECTION: Direction = Direction::Right;

/// Why a run ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Collision {
    Wall,
    Body,
}

/// Result of a single [`SimulationCore::step`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// Not playing; nothing happened.
    Skipped,
    Moved,
    /// Food eaten; the snake grew by one segment.
    Ate { speed_changed: bool },
    Collided(Collision),
}

#[derive(Debug)]
pub struct SimulationCore<S, R, P> {
    rules: Rules,
    grid: Grid,
    /// Head at the front.
    snake: VecDeque<Position>,
    /// Direction applied by the last tick.
    direction: Direction,
    input: InputBuffer,
    food: Option<Position>,
    score: u32,
    speed_ms: u32,
    state: GameState,
    user: Option<String>,
    spawner: FoodSpawner,
    scheduler: S,
    renderer: R,
    store: P,
}

impl<S, R, P> SimulationCore<S, R, P>
where
    S: Scheduler,
    R: RenderSink,
    P: ScoreStore,
{
    /// Build an idle core. `seed` drives food placement.
    pub fn new(
        rules: Rules,
        seed: u64,
        scheduler: S,
        renderer: R,
        store: P,
    ) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            rules,
            grid: rules.grid(),
            snake: VecDeque::with_capacity(rules.initial_length + 1),
            direction: START_DIRECTION,
            input: InputBuffer::new(START_DIRECTION),
            food: None,
            score: 0,
            speed_ms: rules.base_speed_ms,
            state: GameState::Idle,
            user: None,
            spawner: FoodSpawner::new(seed),
            scheduler,
            renderer,
            store,
        })
    }

    /// Begin a fresh run from any state.
    pub fn start(&mut self) {
        self.scheduler.cancel();

        let head = self.grid.centre();
        self.snake.clear();
        self.snake
            .extend((0..self.rules.initial_length as i32).map(|i| Position::new(head.x - i, head.y)));
        self.direction = START_DIRECTION;
        self.input.reset(START_DIRECTION);
        self.score = 0;
        self.speed_ms = self.rules.base_speed_ms;
        self.state = GameState::Playing;
        self.food = self.spawner.spawn(self.grid, &self.snake);

        self.scheduler.arm(self.speed_ms);
        info!(user = self.user.as_deref(), speed_ms = self.speed_ms, "run started");
        self.present();
    }

    /// Buffer a direction for the next tick. Reversals and calls outside a
    /// running game are dropped. Returns whether the intent was kept.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        self.input.offer(direction, self.direction, self.state)
    }

    /// Advance one tick.
    pub fn step(&mut self) -> StepOutcome {
        if self.state != GameState::Playing {
            return StepOutcome::Skipped;
        }

        self.direction = self.input.pending();
        let Some(&head) = self.snake.front() else {
            return StepOutcome::Skipped;
        };
        let next = head.step(self.direction);

        if !self.grid.in_bounds(next) {
            self.game_over(Collision::Wall);
            return StepOutcome::Collided(Collision::Wall);
        }
        if self.snake.contains(&next) {
            self.game_over(Collision::Body);
            return StepOutcome::Collided(Collision::Body);
        }

        self.snake.push_front(next);

        let outcome = if self.food == Some(next) {
            self.score = self.score.saturating_add(self.rules.food_reward);
            self.food = self.spawner.spawn(self.grid, &self.snake);
            let speed_changed = self.apply_speedup();
            debug!(score = self.score, len = self.snake.len(), "food eaten");
            StepOutcome::Ate { speed_changed }
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        };

        self.present();
        outcome
    }

    /// Playing ⇄ Paused. Other states are left alone.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.scheduler.cancel();
                self.state = GameState::Paused;
                debug!("paused");
            }
            GameState::Paused => {
                self.scheduler.cancel();
                self.scheduler.arm(self.speed_ms);
                self.state = GameState::Playing;
                debug!("resumed");
            }
            GameState::Idle | GameState::Over => return,
        }
        self.present();
    }

    /// Stop everything and return to an empty idle board, forgetting the user.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.snake.clear();
        self.food = None;
        self.score = 0;
        self.speed_ms = self.rules.base_speed_ms;
        self.direction = START_DIRECTION;
        self.input.reset(START_DIRECTION);
        self.state = GameState::Idle;
        self.user = None;
        self.present();
    }

    /// Attribute future scores to `user`. Does not touch the board.
    pub fn bind_user(&mut self, user: Option<&str>) {
        self.user = user.map(str::to_owned);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            score: self.score,
            state: self.state,
            direction: self.direction,
            speed_ms: self.speed_ms,
            high_score: self.high_score(),
        }
    }

    /// Best recorded score of the bound user, 0 when none is bound.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.user
            .as_deref()
            .map_or(0, |user| self.store.high_score(user))
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    #[must_use]
    pub fn snake(&self) -> &VecDeque<Position> {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.input.pending()
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Re-arm at a shorter interval when the new score crossed a threshold.
    fn apply_speedup(&mut self) -> bool {
        let next = self.rules.speed_after(self.score, self.speed_ms);
        if next == self.speed_ms {
            return false;
        }
        self.speed_ms = next;
        self.scheduler.cancel();
        self.scheduler.arm(self.speed_ms);
        debug!(speed_ms = self.speed_ms, "speed up");
        true
    }

    fn game_over(&mut self, cause: Collision) {
        self.scheduler.cancel();
        self.state = GameState::Over;
        info!(?cause, score = self.score, len = self.snake.len(), "game over");
        if self.score > 0 {
            if let Some(user) = self.user.as_deref() {
                self.store.record_score(user, self.score);
            }
        }
        self.present();
    }

    fn present(&mut self) {
        let snapshot = self.snapshot();
        self.renderer.present(&snapshot);
    }

    /// Lay out an arbitrary running board.
    #[cfg(test)]
    pub(crate) fn arrange(&mut self, snake: &[Position], direction: Direction, food: Option<Position>) {
        self.snake = snake.iter().copied().collect();
        self.direction = direction;
        self.input.reset(direction);
        self.food = food;
        self.state = GameState::Playing;
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, food: Position) {
        self.food = Some(food);
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32, speed_ms: u32) {
        self.score = score;
        self.speed_ms = speed_ms;
    }
}
