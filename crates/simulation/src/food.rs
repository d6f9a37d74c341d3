//! Food placement: uniform rejection sampling over the board.
//!
//! A cell is drawn uniformly from the whole grid and redrawn while it lies on
//! the snake. Rejection sampling stays uniform over the free cells. Once the
//! snake covers most of the board the retry count is capped and the pick is
//! made directly from the list of free cells, which is uniform as well.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Grid, Position};

/// Rejections allowed per free-cell-list fallback, as a multiple of the board size.
const REJECTION_BUDGET_FACTOR: usize = 4;

/// Seeded source of food positions. The same seed and the same sequence of
/// snakes yields the same food, which keeps runs reproducible in tests.
#[derive(Debug)]
pub struct FoodSpawner {
    rng: SmallRng,
    seed: u64,
}

impl FoodSpawner {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick an empty cell, or `None` when the snake fills the whole board.
    pub fn spawn(&mut self, grid: Grid, snake: &VecDeque<Position>) -> Option<Position> {
        let cells = grid.cell_count();
        if snake.len() >= cells {
            return None;
        }

        for _ in 0..cells * REJECTION_BUDGET_FACTOR {
            let candidate = Position::new(
                self.rng.gen_range(0..grid.count),
                self.rng.gen_range(0..grid.count),
            );
            if !snake.contains(&candidate) {
                return Some(candidate);
            }
        }

        let free: Vec<Position> = grid.positions().filter(|p| !snake.contains(p)).collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row_snake(y: i32, len: i32) -> VecDeque<Position> {
        (0..len).rev().map(|x| Position::new(x, y)).collect()
    }

    #[test]
    fn same_seed_same_food() {
        let grid = Grid::new(20);
        let snake = row_snake(10, 3);
        let mut a = FoodSpawner::new(42);
        let mut b = FoodSpawner::new(42);
        for _ in 0..20 {
            assert_eq!(a.spawn(grid, &snake), b.spawn(grid, &snake));
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn full_board_has_no_food() {
        let grid = Grid::new(3);
        let snake: VecDeque<Position> = grid.positions().collect();
        let mut spawner = FoodSpawner::new(7);
        assert_eq!(spawner.spawn(grid, &snake), None);
    }

    #[test]
    fn single_free_cell_is_found() {
        let grid = Grid::new(4);
        let hole = Position::new(2, 3);
        let snake: VecDeque<Position> = grid.positions().filter(|&p| p != hole).collect();
        let mut spawner = FoodSpawner::new(1);
        for _ in 0..10 {
            assert_eq!(spawner.spawn(grid, &snake), Some(hole));
        }
    }

    #[test]
    fn every_free_cell_is_reachable() {
        let grid = Grid::new(4);
        let snake = row_snake(0, 4);
        let mut spawner = FoodSpawner::new(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(spawner.spawn(grid, &snake).unwrap());
        }
        assert_eq!(seen.len(), grid.cell_count() - snake.len());
    }

    proptest! {
        #[test]
        fn prop_food_never_on_snake(
            seed in any::<u64>(),
            y in 0i32..20,
            len in 1i32..20,
        ) {
            let grid = Grid::new(20);
            let snake = row_snake(y, len);
            let mut spawner = FoodSpawner::new(seed);
            let food = spawner.spawn(grid, &snake).unwrap();
            prop_assert!(grid.in_bounds(food));
            prop_assert!(!snake.contains(&food));
        }
    }
}
