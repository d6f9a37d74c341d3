//! Whole-run scenarios and random-play invariants for the state machine.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::game::{Collision, SimulationCore, StepOutcome};
    use crate::grid::{Direction, Position};
    use crate::rules::Rules;
    use crate::scheduler::{ManualScheduler, Scheduler};
    use crate::snapshot::{FrameLog, GameState};
    use crate::store::MemoryScores;

    type TestCore = SimulationCore<ManualScheduler, FrameLog, MemoryScores>;

    fn core_with(rules: Rules, seed: u64) -> TestCore {
        SimulationCore::new(
            rules,
            seed,
            ManualScheduler::new(),
            FrameLog::default(),
            MemoryScores::default(),
        )
        .unwrap()
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    /// Helper: ASCII picture of the board for failure output.
    fn dump(core: &TestCore) -> String {
        let n = core.rules().grid_count;
        let mut out = String::new();
        for y in 0..n {
            for x in 0..n {
                let here = p(x, y);
                out.push(if core.snake().front() == Some(&here) {
                    '@'
                } else if core.snake().contains(&here) {
                    'o'
                } else if core.food() == Some(here) {
                    '*'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn wall_collision_at_right_edge_keeps_score() {
        let mut core = core_with(Rules::default(), 1);
        core.arrange(&[p(19, 4), p(18, 4), p(17, 4)], Direction::Right, Some(p(2, 2)));
        core.set_score(20, 150);

        assert_eq!(core.step(), StepOutcome::Collided(Collision::Wall));
        assert_eq!(core.state(), GameState::Over);
        assert_eq!(core.score(), 20);
        assert_eq!(core.snake().len(), 3);
        assert_eq!(core.scheduler().armed(), None);
    }

    #[test]
    fn doubling_back_into_body_ends_run() {
        let mut core = core_with(Rules::default(), 1);
        // Head moved up from (5, 6); (6, 5) is a body segment to its right.
        core.arrange(
            &[p(5, 5), p(5, 6), p(6, 6), p(6, 5), p(7, 5)],
            Direction::Up,
            Some(p(0, 0)),
        );
        assert!(core.set_pending_direction(Direction::Right));

        assert_eq!(core.step(), StepOutcome::Collided(Collision::Body));
        assert_eq!(core.state(), GameState::Over, "\n{}", dump(&core));
    }

    #[test]
    fn five_food_items_score_fifty_and_speed_up_once() {
        let mut core = core_with(Rules::default(), 3);
        core.start();
        for _ in 0..5 {
            let ahead = core.snake().front().unwrap().step(Direction::Right);
            core.place_food(ahead);
            assert!(matches!(core.step(), StepOutcome::Ate { .. }), "\n{}", dump(&core));
        }
        assert_eq!(core.score(), 50);
        assert_eq!(core.speed_ms(), 140);
        assert_eq!(core.snake().len(), 8);
        assert_eq!(core.scheduler().history, vec![150, 140]);
        assert_eq!(core.scheduler().overlapping_arms, 0);
    }

    #[test]
    fn pause_twice_restores_playing_with_board_unchanged() {
        let mut core = core_with(Rules::default(), 4);
        core.start();
        core.step();
        let before = core.snapshot();

        core.toggle_pause();
        core.toggle_pause();

        let after = core.snapshot();
        assert_eq!(after.state, GameState::Playing);
        assert_eq!(after.snake, before.snake);
        assert_eq!(after.score, before.score);
        assert_eq!(after.food, before.food);
    }

    #[test]
    fn reset_from_every_state_is_idle_and_empty() {
        let reach: [fn(&mut TestCore); 4] = [
            |_| {},
            |c| c.start(),
            |c| {
                c.start();
                c.toggle_pause();
            },
            |c| {
                c.arrange(&[p(0, 0), p(1, 0), p(2, 0)], Direction::Left, None);
                c.step();
            },
        ];
        for setup in reach {
            let mut core = core_with(Rules::default(), 5);
            setup(&mut core);
            core.reset();
            core.reset();
            assert_eq!(core.state(), GameState::Idle);
            assert!(core.snake().is_empty());
            assert_eq!(core.score(), 0);
        }
    }

    #[test]
    fn full_board_run_ends_without_food() {
        // 3×3 board: the snake can never find an empty cell past 9 segments.
        let rules = Rules {
            grid_count: 3,
            initial_length: 2,
            ..Rules::default()
        };
        let mut core = core_with(rules, 9);
        let board: Vec<Position> = vec![
            p(0, 1), p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2), p(1, 2), p(0, 2),
        ];
        core.arrange(&board, Direction::Down, Some(p(1, 1)));
        core.set_pending_direction(Direction::Right);
        assert!(matches!(core.step(), StepOutcome::Ate { .. }));
        assert_eq!(core.snake().len(), 9);
        assert_eq!(core.food(), None);
        assert!(matches!(core.step(), StepOutcome::Collided(_)));
    }

    fn arb_intent() -> impl Strategy<Value = Option<Direction>> {
        prop_oneof![
            2 => Just(None),
            1 => Just(Some(Direction::Up)),
            1 => Just(Some(Direction::Down)),
            1 => Just(Some(Direction::Left)),
            1 => Just(Some(Direction::Right)),
        ]
    }

    proptest! {
        #[test]
        fn prop_random_play_keeps_invariants(
            seed in any::<u64>(),
            intents in proptest::collection::vec(arb_intent(), 1..300),
        ) {
            let rules = Rules { grid_count: 8, ..Rules::default() };
            let mut core = core_with(rules, seed);
            core.start();
            let mut last_speed = core.speed_ms();

            for intent in intents {
                if core.state() != GameState::Playing {
                    core.start();
                    last_speed = core.speed_ms();
                }
                if let Some(d) = intent {
                    let committed = core.direction();
                    let before = core.pending_direction();
                    let accepted = core.set_pending_direction(d);
                    if d == committed.opposite() {
                        prop_assert!(!accepted);
                        prop_assert_eq!(core.pending_direction(), before);
                    }
                }

                let len_before = core.snake().len();
                let score_before = core.score();
                let outcome = core.step();

                match outcome {
                    StepOutcome::Ate { .. } => {
                        prop_assert_eq!(core.snake().len(), len_before + 1);
                        prop_assert_eq!(core.score(), score_before + rules.food_reward);
                    }
                    StepOutcome::Moved => prop_assert_eq!(core.snake().len(), len_before),
                    StepOutcome::Collided(_) => {
                        prop_assert_eq!(core.state(), GameState::Over);
                        prop_assert_eq!(core.score(), score_before);
                        prop_assert_eq!(core.scheduler().armed(), None);
                    }
                    StepOutcome::Skipped => prop_assert!(false, "step skipped while playing"),
                }

                if core.state() == GameState::Playing {
                    let unique: HashSet<Position> = core.snake().iter().copied().collect();
                    prop_assert_eq!(unique.len(), core.snake().len(), "\n{}", dump(&core));
                    let segs: Vec<Position> = core.snake().iter().copied().collect();
                    for pair in segs.windows(2) {
                        prop_assert!(pair[0].is_adjacent(pair[1]));
                    }
                    if let Some(food) = core.food() {
                        prop_assert!(!core.snake().contains(&food));
                    }
                }

                prop_assert!(core.speed_ms() <= last_speed);
                prop_assert!(core.speed_ms() >= rules.speed_floor_ms);
                last_speed = core.speed_ms();
            }
            prop_assert_eq!(core.scheduler().overlapping_arms, 0);
        }
    }
}
