//! Integration tests for whole episodes.
//!
//! Exercises: GameConfig → Cave generation → placement → step/reward loop
//! → Report, through the public API only.

use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wumpus_logic::constants::{MAX_FOOD, NEAR_FACTOR, PLACEMENT_ATTEMPTS};
use wumpus_logic::grid::Grid;
use wumpus_logic::maze;
use wumpus_logic::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn config(model: RewardModel, seed: u64) -> GameConfig {
    GameConfig {
        reward_model: model,
        seed,
        ..GameConfig::default()
    }
}

/// Directions that walk from the player to a cell next to the exit using
/// only empty floor, followed by the move onto the exit.
fn path_to_exit(game: &Game) -> Option<Vec<Direction>> {
    let cave = game.cave();
    let exit = cave.find(Cell::Exit)?;
    let start = game.player().position;

    let mut came_from: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        if let Some(last) = Direction::ALL.into_iter().find(|d| pos.offset(*d) == exit) {
            let mut route = vec![last];
            let mut at = pos;
            while at != start {
                let (prev, dir) = came_from[&at];
                route.push(dir);
                at = prev;
            }
            route.reverse();
            return Some(route);
        }
        for dir in Direction::ALL {
            let next = pos.offset(dir);
            if next != start && cave.cell(next) == Cell::Empty && !came_from.contains_key(&next) {
                came_from.insert(next, (pos, dir));
                queue.push_back(next);
            }
        }
    }
    None
}

fn removed_walls(grid: &Grid) -> usize {
    let mut n = 0;
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            if !grid.at(r, c).is_wall() && (r % 2 == 0) != (c % 2 == 0) {
                n += 1;
            }
        }
    }
    n
}

// ── Reward model parity ────────────────────────────────────────────────

#[test]
fn empty_handed_exit_parity() {
    for seed in [903_387_237u64, 1, 2, 3] {
        let mut m1 = Game::new(config(RewardModel::Model1, seed)).unwrap();
        let mut m2 = Game::new(config(RewardModel::Model2, seed)).unwrap();
        assert_eq!(m1.cave(), m2.cave(), "same seed, same cave");
        assert_eq!(m1.cave().layout(), wumpus_logic::cave::Layout::Studio);

        let route = path_to_exit(&m1).expect("exit reachable in a studio cave");
        let (last, walk) = route.split_last().unwrap();
        for dir in walk {
            assert!(!m1.step(*dir).unwrap().done);
            assert!(!m2.step(*dir).unwrap().done);
        }
        assert_eq!(m1.player().gold, 0);

        let out1 = m1.step(*last).unwrap();
        assert_eq!(out1.reward, -2.0);
        assert_eq!(out1.status, PlayerStatus::Escaped);
        assert!(out1.done);

        let out2 = m2.step(*last).unwrap();
        assert_eq!(out2.reward, -100.0);
        assert_eq!(out2.status, PlayerStatus::Escaped);
        assert!(out2.done);
    }
}

// ── Food economy ───────────────────────────────────────────────────────

#[test]
fn food_drains_once_every_ten_steps() {
    let cave = Cave::from_grid(Grid::bordered(12, 12));
    let mut game = Game::from_cave(GameConfig::default(), cave, Position::new(1, 1));

    for k in 1..MAX_FOOD {
        for _ in 0..10 {
            let out = game.step(Direction::North).unwrap();
            assert!(!out.done);
        }
        assert_eq!(game.player().food, MAX_FOOD - k, "after {} steps", 10 * k);
    }
    assert_eq!(game.player().food, 1);

    let out = game.step(Direction::North).unwrap();
    assert!(out.done);
    assert_eq!(out.status, PlayerStatus::Dead);
    assert_eq!(out.reward, -7.0);
    assert_eq!(game.steps(), 10 * (MAX_FOOD as u32 - 1) + 1);
}

#[test]
fn wall_bump_penalty_is_divided_by_food_spent() {
    let cave = Cave::from_grid(Grid::bordered(12, 12));
    let mut game = Game::from_cave(GameConfig::default(), cave, Position::new(1, 1));
    for _ in 0..200 {
        let out = game.step(Direction::West).unwrap();
        let food = game.player().food as f64;
        let expected = -1.0 / (1.0 - food / MAX_FOOD as f64);
        assert_eq!(out.reward, expected);
    }
    // 200 steps drain 20 food: -1 / (20/64)
    assert_eq!(game.player().food, MAX_FOOD - 20);
}

// ── Determinism ────────────────────────────────────────────────────────

#[test]
fn same_seed_same_episode() {
    for model in [RewardModel::Model1, RewardModel::Model2] {
        for algo in MazeAlgorithm::ALL {
            let cfg = GameConfig {
                rows: 31,
                columns: 29,
                maze_algorithm: algo,
                move_wumpus: true,
                ..config(model, 77)
            };
            let mut a = Game::new(cfg.clone()).unwrap();
            let mut b = Game::new(cfg).unwrap();
            assert_eq!(a.cave(), b.cave());
            assert_eq!(a.report(), b.report());

            let mut policy_a = StdRng::seed_from_u64(5);
            let mut policy_b = StdRng::seed_from_u64(5);
            for _ in 0..500 {
                let ra = a.step_action(&[policy_a.gen_range(0..8)]).unwrap();
                let rb = b.step_action(&[policy_b.gen_range(0..8)]).unwrap();
                assert_eq!(ra, rb);
                assert_eq!(a.report(), b.report());
                if ra.done {
                    break;
                }
            }
            assert_eq!(a.cave(), b.cave());
        }
    }
}

#[test]
fn different_seeds_differ() {
    let a = Game::new(config(RewardModel::Model1, 1)).unwrap();
    let b = Game::new(config(RewardModel::Model1, 2)).unwrap();
    assert_ne!(a.cave(), b.cave());
}

// ── Terminal handling ──────────────────────────────────────────────────

#[test]
fn finished_episodes_stay_finished() {
    let mut game = Game::new(config(RewardModel::Model2, 12)).unwrap();
    let route = path_to_exit(&game).unwrap();
    for dir in &route {
        game.step(*dir).unwrap();
    }
    assert!(game.is_done());

    let before = game.report();
    for dir in Direction::ALL {
        assert_eq!(
            game.step(dir),
            Err(GameError::EpisodeFinished(PlayerStatus::Escaped))
        );
    }
    assert_eq!(game.report(), before);
    assert_eq!(game.episode(), 0);

    game.restart().unwrap();
    assert_eq!(game.status(), PlayerStatus::Alive);
    assert_eq!(game.episode(), 1);
}

// ── Maze guarantees ────────────────────────────────────────────────────

#[test]
fn generated_mazes_are_connected() {
    for algo in MazeAlgorithm::ALL {
        for seed in 0..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rows = 2 + (seed as usize * 7) % 15;
            let cols = 2 + (seed as usize * 5) % 17;
            let grid = maze::generate(algo, rows, cols, &mut rng).unwrap();
            assert!(grid.is_connected(), "{} {}x{} seed {}", algo.name(), rows, cols, seed);
        }
    }
}

#[test]
fn spanning_tree_mazes_remove_exactly_cells_minus_one_walls() {
    for algo in [MazeAlgorithm::Kruskal, MazeAlgorithm::Prim] {
        for (rows, cols) in [(1, 1), (1, 9), (5, 5), (12, 7), (20, 30)] {
            let grid = maze::generate(algo, rows, cols, &mut StdRng::seed_from_u64(3)).unwrap();
            assert_eq!(removed_walls(&grid), rows * cols - 1, "{} {}x{}", algo.name(), rows, cols);
            assert_eq!(grid.open_count(), 2 * rows * cols - 1);
        }
    }
}

// ── Placement ──────────────────────────────────────────────────────────

#[test]
fn placements_respect_distance_or_exhaust_attempts() {
    let mut rng = StdRng::seed_from_u64(31);
    for seed in 0..15u64 {
        for (rows, cols) in [(12, 12), (6, 9), (30, 30)] {
            let cave = Cave::new(rows, cols, &mut StdRng::seed_from_u64(seed)).unwrap();
            let wumpus = cave.wumpus_location().unwrap();
            for _ in 0..20 {
                let p = cave.place(&mut rng);
                if p.satisfied {
                    let (dr, dc) = p.position.axis_deltas(wumpus);
                    assert!(dr >= NEAR_FACTOR && dc >= NEAR_FACTOR);
                    assert_eq!(cave.cell(p.position), Cell::Empty);
                } else {
                    assert_eq!(p.attempts, PLACEMENT_ATTEMPTS);
                }
            }
        }
    }
}

// ── Input validation ───────────────────────────────────────────────────

#[test]
fn malformed_actions_fail_fast() {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let before = game.report();
    assert!(matches!(
        game.step_action(&[0, 0]),
        Err(GameError::ActionArity { expected: 1, found: 2 })
    ));
    assert!(matches!(
        game.step_action(&[99]),
        Err(GameError::ActionOutOfRange { index: 99, .. })
    ));
    assert_eq!(game.report(), before);
    assert_eq!(game.steps(), 0);
}

#[test]
fn misconfigured_dimensions_are_reported() {
    let err = Game::new(GameConfig::with_size(2, 4)).unwrap_err();
    match &err {
        GameError::InvalidConfig(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
    let text = err.to_string();
    assert!(text.contains("rows 2"));
    assert!(text.contains("columns 4"));
}

#[test]
fn report_location_is_row_major() {
    let mut game = Game::new(GameConfig::with_size(9, 14)).unwrap();
    for dir in [Direction::East, Direction::South, Direction::SouthEast] {
        if game.step(dir).unwrap().done {
            break;
        }
        let r = game.report();
        assert_eq!(r.location, r.row * 14 + r.column);
        assert_eq!(r.adjacent, game.cave().what_do_i_see(game.player().position));
    }
}
