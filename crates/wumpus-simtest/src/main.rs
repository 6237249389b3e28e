//! Wumpus Headless Episode Harness
//!
//! Validates maze generation, cave placement and the reward models outside
//! of `cargo test`, then plays seeded random-policy episodes and prints a
//! JSON summary. Runs entirely in-process with no rendering.
//!
//! Usage:
//!   cargo run -p wumpus-simtest
//!   cargo run -p wumpus-simtest -- --verbose --episodes 500 --model 2
//!   cargo run -p wumpus-simtest -- --rows 41 --cols 41 --maze prim --seed 7
//!   cargo run -p wumpus-simtest -- --moves n,ne,e,e --model 2

use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use clap::Parser;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use wumpus_logic::cave::{Cave, Layout};
use wumpus_logic::cell::Cell;
use wumpus_logic::config::{GameConfig, DEFAULT_SEED};
use wumpus_logic::constants::{MAX_FOOD, NEAR_FACTOR, PLACEMENT_ATTEMPTS};
use wumpus_logic::direction::{Direction, Position};
use wumpus_logic::game::{Game, RewardModel};
use wumpus_logic::grid::Grid;
use wumpus_logic::maze::{self, MazeAlgorithm};
use wumpus_logic::persistence;
use wumpus_logic::render;
use wumpus_logic::report::{PlayerStatus, Report};

/// Upper bound on steps per random episode. Starvation ends every episode
/// well before this.
const MAX_EPISODE_STEPS: u32 = 10_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Parser)]
#[command(name = "wumpus-simtest")]
#[command(about = "Headless episode harness for the Wumpus cave")]
struct Args {
    /// Print section details, sample boards and info-level logs
    #[arg(long, default_value_t = false)]
    verbose: bool,
    #[arg(long, default_value_t = 200)]
    episodes: u32,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Reward model to play (1 or 2); both when omitted
    #[arg(long, value_parser = parse_model)]
    model: Option<RewardModel>,
    #[arg(long, default_value_t = 12)]
    rows: usize,
    #[arg(long, default_value_t = 12)]
    cols: usize,
    /// backtracker, kruskal or prim
    #[arg(long, default_value = MazeAlgorithm::default().name(), value_parser = parse_maze)]
    maze: MazeAlgorithm,
    /// Comma-separated moves to play and draw before the checks, e.g. `n,ne,e`
    #[arg(long, value_delimiter = ',')]
    moves: Vec<Direction>,
}

impl Args {
    fn models(&self) -> Vec<RewardModel> {
        match self.model {
            Some(model) => vec![model],
            None => vec![RewardModel::Model1, RewardModel::Model2],
        }
    }

    fn config(&self, model: RewardModel) -> GameConfig {
        GameConfig {
            rows: self.rows,
            columns: self.cols,
            seed: self.seed,
            reward_model: model,
            maze_algorithm: self.maze,
            ..GameConfig::default()
        }
    }
}

fn parse_model(value: &str) -> Result<RewardModel, String> {
    value
        .parse::<u8>()
        .ok()
        .and_then(RewardModel::from_number)
        .ok_or_else(|| format!("reward model must be 1 or 2, got {:?}", value))
}

fn parse_maze(value: &str) -> Result<MazeAlgorithm, String> {
    MazeAlgorithm::from_name(value).ok_or_else(|| {
        let names: Vec<_> = MazeAlgorithm::ALL.iter().map(|a| a.name()).collect();
        format!("unknown maze {:?}, expected one of {}", value, names.join(", "))
    })
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    println!("=== Wumpus Episode Harness ===\n");

    let verbose = args.verbose;
    let mut results = Vec::new();

    // 0. Scripted moves
    if !args.moves.is_empty() {
        results.extend(play_scripted_moves(&args));
    }

    // 1. Maze generators
    results.extend(validate_mazes(verbose));

    // 2. Cave construction and placement
    results.extend(validate_caves(verbose));

    // 3. Reward model parity at the exit
    results.extend(validate_reward_parity(verbose));

    // 4. Food economy
    results.extend(validate_food_economy(verbose));

    // 5. Determinism and snapshots
    results.extend(validate_determinism(verbose));

    // 6. Random-policy episodes
    let (episode_results, stats) = run_random_episodes(&args);
    results.extend(episode_results);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("could not encode summary: {}", e),
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 0. Scripted moves ───────────────────────────────────────────────────

fn play_scripted_moves(args: &Args) -> Vec<TestResult> {
    println!("--- Scripted Moves ---");
    let mut results = Vec::new();

    for model in args.models() {
        let mut game = match Game::new(args.config(model)) {
            Ok(g) => g,
            Err(e) => {
                results.push(TestResult {
                    name: format!("script_model{}_setup", model.number()),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };
        println!("model {}:\n{}", model.number(), game.render());

        let mut total = 0.0;
        let mut played = 0;
        let mut rejected = None;
        for dir in &args.moves {
            match game.step(*dir) {
                Ok(out) => {
                    played += 1;
                    total += out.reward;
                    println!(
                        "{} -> reward {:.3}, food {}, {:?}",
                        dir.as_str(),
                        out.reward,
                        game.player().food,
                        out.status
                    );
                    print!("{}", render::draw_view(game.cave(), game.player().position));
                }
                Err(e) => {
                    rejected = Some(e.to_string());
                    break;
                }
            }
        }
        if args.verbose {
            println!("{}", game.render());
        }

        results.push(TestResult {
            name: format!("script_model{}", model.number()),
            passed: true,
            detail: match rejected {
                Some(e) => format!("{} of {} moves, then {}", played, args.moves.len(), e),
                None => format!("{} moves, total reward {:.3}", played, total),
            },
        });
    }

    results
}

// ── 1. Maze generators ──────────────────────────────────────────────────

/// Open positions with exactly one even coordinate are removed walls.
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

fn validate_mazes(verbose: bool) -> Vec<TestResult> {
    println!("--- Maze Generators ---");
    let mut results = Vec::new();

    for algo in MazeAlgorithm::ALL {
        let mut disconnected = 0;
        let mut open_cells = 0usize;
        let runs = 200u64;
        for seed in 0..runs {
            let mut rng = StdRng::seed_from_u64(seed);
            let rows = 2 + (seed as usize * 7) % 30;
            let cols = 2 + (seed as usize * 11) % 30;
            match maze::generate(algo, rows, cols, &mut rng) {
                Ok(grid) => {
                    open_cells += grid.open_count();
                    if !grid.is_connected() {
                        disconnected += 1;
                    }
                }
                Err(_) => disconnected += 1,
            }
        }
        if verbose {
            println!(
                "  {}: mean open cells {:.1}",
                algo.name(),
                open_cells as f64 / runs as f64
            );
            if let Ok(sample) = maze::generate(algo, 6, 12, &mut StdRng::seed_from_u64(runs)) {
                print!("{}", sample.wall_map());
            }
        }
        results.push(TestResult {
            name: format!("maze_{}_connected", algo.name()),
            passed: disconnected == 0,
            detail: format!("{} of {} mazes disconnected", disconnected, runs),
        });
    }

    for algo in [MazeAlgorithm::Kruskal, MazeAlgorithm::Prim] {
        let mut wrong = Vec::new();
        for (rows, cols) in [(1, 1), (3, 8), (10, 10), (25, 40)] {
            let mut rng = StdRng::seed_from_u64(rows as u64 * 131 + cols as u64);
            if let Ok(grid) = maze::generate(algo, rows, cols, &mut rng) {
                let removed = removed_walls(&grid);
                if removed != rows * cols - 1 {
                    wrong.push(format!("{}x{}: {}", rows, cols, removed));
                }
            }
        }
        results.push(TestResult {
            name: format!("maze_{}_spanning_tree", algo.name()),
            passed: wrong.is_empty(),
            detail: if wrong.is_empty() {
                "removed walls = cells - 1".into()
            } else {
                format!("wrong wall counts: {}", wrong.join(", "))
            },
        });
    }

    let mut rng = StdRng::seed_from_u64(1);
    results.push(TestResult {
        name: "maze_rejects_empty".into(),
        passed: MazeAlgorithm::ALL
            .iter()
            .all(|a| maze::generate(*a, 0, 4, &mut rng).is_err()),
        detail: "0 rows → DimensionsTooSmall".into(),
    });

    results
}

// ── 2. Caves ────────────────────────────────────────────────────────────

fn validate_caves(verbose: bool) -> Vec<TestResult> {
    println!("--- Cave Placement ---");
    let mut results = Vec::new();

    let mut miscounted = 0;
    let mut far_treasure = 0;
    let mut fallbacks = 0;
    let mut violations = 0;
    let mut sampler = StdRng::seed_from_u64(99);

    for seed in 0..300u64 {
        let cave = match Cave::new(12, 12, &mut StdRng::seed_from_u64(seed)) {
            Ok(c) => c,
            Err(_) => {
                miscounted += 1;
                continue;
            }
        };
        let grid = cave.grid();
        let counts_ok = [Cell::Wumpus, Cell::Treasure, Cell::Pit, Cell::Exit, Cell::Food]
            .iter()
            .all(|c| grid.count(*c) == 1);
        if !counts_ok {
            miscounted += 1;
        }
        if let (Some(w), Some(t)) = (cave.wumpus_location(), cave.treasure_location()) {
            if w.chebyshev(t) != 1 {
                far_treasure += 1;
            }
            for _ in 0..10 {
                let p = cave.place(&mut sampler);
                if !p.satisfied {
                    fallbacks += 1;
                    if p.attempts != PLACEMENT_ATTEMPTS {
                        violations += 1;
                    }
                    continue;
                }
                let (dr, dc) = p.position.axis_deltas(w);
                if dr < NEAR_FACTOR || dc < NEAR_FACTOR || cave.cell(p.position) != Cell::Empty {
                    violations += 1;
                }
            }
        }
    }

    if verbose {
        println!("  placement fallbacks in 3000 placements: {}", fallbacks);
    }

    results.push(TestResult {
        name: "cave_entity_counts".into(),
        passed: miscounted == 0,
        detail: format!("{} of 300 studio caves miscounted", miscounted),
    });
    results.push(TestResult {
        name: "cave_treasure_beside_wumpus".into(),
        passed: far_treasure == 0,
        detail: format!("{} caves with a stray treasure", far_treasure),
    });
    results.push(TestResult {
        name: "cave_placement_distance".into(),
        passed: violations == 0,
        detail: format!("{} violations, {} fallbacks", violations, fallbacks),
    });

    let layouts_ok = MazeAlgorithm::ALL.iter().all(|a| {
        let mut rng = StdRng::seed_from_u64(8);
        matches!(
            Cave::generate(41, 37, *a, 25, &mut rng).map(|c| c.layout()),
            Ok(Layout::Maze(x)) if x == *a
        )
    });
    results.push(TestResult {
        name: "cave_maze_above_threshold".into(),
        passed: layouts_ok,
        detail: "41x37 caves use the configured generator".into(),
    });

    results
}

// ── 3. Reward parity ────────────────────────────────────────────────────

/// Directions from the player to the exit across empty floor.
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

/// Walk to the exit empty-handed; returns the final (reward, status).
fn empty_handed_exit(model: RewardModel, seed: u64) -> Option<(f64, PlayerStatus)> {
    let config = GameConfig {
        reward_model: model,
        seed,
        ..GameConfig::default()
    };
    let mut game = Game::new(config).ok()?;
    let route = path_to_exit(&game)?;
    let mut last = None;
    for dir in route {
        let out = game.step(dir).ok()?;
        last = Some((out.reward, out.status));
    }
    last
}

fn validate_reward_parity(_verbose: bool) -> Vec<TestResult> {
    println!("--- Reward Parity ---");
    let mut results = Vec::new();

    let seeds = [DEFAULT_SEED, 1, 2, 3, 4, 5];
    let m1: Vec<_> = seeds.iter().map(|s| empty_handed_exit(RewardModel::Model1, *s)).collect();
    let m2: Vec<_> = seeds.iter().map(|s| empty_handed_exit(RewardModel::Model2, *s)).collect();

    results.push(TestResult {
        name: "parity_model1_exit".into(),
        passed: m1.iter().all(|r| *r == Some((-2.0, PlayerStatus::Escaped))),
        detail: "model 1, no gold → -2, Escaped".into(),
    });
    results.push(TestResult {
        name: "parity_model2_exit".into(),
        passed: m2.iter().all(|r| *r == Some((-100.0, PlayerStatus::Escaped))),
        detail: "model 2, no gold → -100, Escaped".into(),
    });

    results
}

// ── 4. Food economy ─────────────────────────────────────────────────────

fn validate_food_economy(_verbose: bool) -> Vec<TestResult> {
    println!("--- Food Economy ---");
    let mut results = Vec::new();

    let cave = Cave::from_grid(Grid::bordered(12, 12));
    let mut game = Game::from_cave(GameConfig::default(), cave, Position::new(1, 1));
    let mut drift = Vec::new();
    let mut died_at = None;
    for step in 1..=1000u32 {
        match game.step(Direction::North) {
            Ok(out) if out.done => {
                died_at = Some((step, out.reward));
                break;
            }
            Ok(_) => {
                if step % 10 == 0 {
                    let expected = MAX_FOOD - (step / 10) as i32;
                    if game.player().food != expected {
                        drift.push(step);
                    }
                }
            }
            Err(_) => break,
        }
    }

    results.push(TestResult {
        name: "food_decrements_every_ten".into(),
        passed: drift.is_empty(),
        detail: format!("{} checkpoints off", drift.len()),
    });
    results.push(TestResult {
        name: "food_starvation".into(),
        passed: died_at == Some((10 * (MAX_FOOD as u32 - 1) + 1, -7.0)),
        detail: format!("starved at {:?}", died_at),
    });

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn play(config: &GameConfig, policy_seed: u64) -> Option<Vec<f64>> {
    let mut game = Game::new(config.clone()).ok()?;
    let mut policy = StdRng::seed_from_u64(policy_seed);
    let mut rewards = Vec::new();
    for _ in 0..MAX_EPISODE_STEPS {
        let out = game.step_action(&[policy.gen_range(0..Game::NUM_ACTIONS[0])]).ok()?;
        rewards.push(out.reward);
        if out.done {
            break;
        }
    }
    Some(rewards)
}

fn validate_determinism(_verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let mut mismatches = 0;
    for algo in MazeAlgorithm::ALL {
        for model in [RewardModel::Model1, RewardModel::Model2] {
            let config = GameConfig {
                rows: 33,
                columns: 33,
                reward_model: model,
                maze_algorithm: algo,
                move_wumpus: true,
                seed: 4,
                ..GameConfig::default()
            };
            let a = play(&config, 10);
            if a.is_none() || a != play(&config, 10) {
                mismatches += 1;
            }
        }
    }
    results.push(TestResult {
        name: "determinism_reward_sequences".into(),
        passed: mismatches == 0,
        detail: format!("{} of 6 configurations diverged", mismatches),
    });

    let snapshot_ok = Game::new(GameConfig::default())
        .ok()
        .and_then(|mut game| {
            game.step(Direction::East).ok()?;
            let mut buffer = Vec::new();
            persistence::save_game(&mut buffer, &game).ok()?;
            let loaded = persistence::load_game(&buffer[..]).ok()?;
            Some(loaded.report() == game.report() && loaded.snapshot() == game.snapshot())
        })
        .unwrap_or(false);
    results.push(TestResult {
        name: "snapshot_roundtrip".into(),
        passed: snapshot_ok,
        detail: "bincode save/load preserves the episode".into(),
    });

    results
}

// ── 6. Random-policy episodes ───────────────────────────────────────────

/// The packed key and the rendered view line both give back what the
/// player sees.
fn observation_roundtrips(game: &Game, report: &Report) -> bool {
    let key = report.encode();
    let line = render::view_line(game.cave(), game.player().position);
    Report::decode_adjacent(key) == report.adjacent
        && Report::decode_inventory(key) == (report.gold > 0, report.food_level)
        && render::parse_view_line(&line) == Some(report.adjacent)
}

#[derive(Debug, Default, Serialize)]
struct PolicyStats {
    model: u8,
    maze: String,
    rows: usize,
    columns: usize,
    episodes: u32,
    wins: u32,
    escapes: u32,
    deaths: u32,
    unfinished: u32,
    mean_reward: f64,
    mean_steps: f64,
    treasure_found: u32,
}

fn run_random_episodes(args: &Args) -> (Vec<TestResult>, Vec<PolicyStats>) {
    println!("--- Random Policy ---");
    let mut results = Vec::new();
    let mut all_stats = Vec::new();

    for model in args.models() {
        let config = args.config(model);
        let mut game = match Game::new(config) {
            Ok(g) => g,
            Err(e) => {
                results.push(TestResult {
                    name: format!("episodes_model{}_setup", model.number()),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        let mut policy = StdRng::seed_from_u64(args.seed ^ 0x5eed);
        let mut stats = PolicyStats {
            model: model.number(),
            maze: args.maze.name().to_string(),
            rows: args.rows,
            columns: args.cols,
            ..PolicyStats::default()
        };
        let mut total_reward = 0.0;
        let mut total_steps = 0u64;
        let mut bad_reports = 0;

        for episode in 0..args.episodes {
            if episode > 0 {
                if let Err(e) = game.restart() {
                    log::warn!("restart failed: {}", e);
                    break;
                }
            }
            let columns = game.cave().columns();
            let mut finished = false;
            for _ in 0..MAX_EPISODE_STEPS {
                let action = [policy.gen_range(0..Game::NUM_ACTIONS[0])];
                let out = match game.step_action(&action) {
                    Ok(o) => o,
                    Err(e) => {
                        log::warn!("episode {}: {}", episode, e);
                        break;
                    }
                };
                total_reward += out.reward;
                total_steps += 1;
                let report = game.report();
                if report.location != report.row * columns + report.column
                    || !out.reward.is_finite()
                    || !observation_roundtrips(&game, &report)
                {
                    bad_reports += 1;
                }
                if out.done {
                    finished = true;
                    break;
                }
            }
            if game.player().gold > 0 {
                stats.treasure_found += 1;
            }
            match game.status() {
                PlayerStatus::Win => stats.wins += 1,
                PlayerStatus::Escaped => stats.escapes += 1,
                PlayerStatus::Dead => stats.deaths += 1,
                PlayerStatus::Alive => {}
            }
            if !finished {
                stats.unfinished += 1;
            }
            if args.verbose && episode < 3 {
                println!("{}", game.render());
            }
        }

        stats.episodes = args.episodes;
        if args.episodes > 0 {
            stats.mean_reward = total_reward / args.episodes as f64;
            stats.mean_steps = total_steps as f64 / args.episodes as f64;
        }

        results.push(TestResult {
            name: format!("episodes_model{}_terminate", model.number()),
            passed: stats.unfinished == 0,
            detail: format!(
                "{} episodes: {} win, {} escaped, {} dead",
                stats.episodes, stats.wins, stats.escapes, stats.deaths
            ),
        });
        results.push(TestResult {
            name: format!("episodes_model{}_reports", model.number()),
            passed: bad_reports == 0,
            detail: format!("{} inconsistent reports", bad_reports),
        });
        all_stats.push(stats);
    }

    (results, all_stats)
}
