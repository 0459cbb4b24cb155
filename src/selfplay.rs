//! Self-play game generation.
//!
//! Plays complete matches between two random-policy sides on the standard
//! board. Each game is driven through the same submit/tick path the
//! registry uses, with a synthetic clock, and recorded tick by tick.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::board::{Board, Side, Topology, ALL_SIDES};
use crate::game::{Match, Millis};
use crate::movegen::random_move;
use crate::resolve::ResolvedMove;

/// Synthetic tick interval used for self-play clocks.
const TICK_MS: Millis = 1_000;

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Ticks before a game is stopped without a winner.
    pub max_ticks: u32,
    /// Suppress per-game progress logging.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            threads: 4,
            seed: 0,
            max_ticks: 500,
            quiet: false,
        }
    }
}

/// One resolved tick of a self-play game.
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub tick: u32,
    pub resolved: Vec<ResolvedMove>,
    /// Board after the tick.
    pub board: Vec<Option<i8>>,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub winner: Option<Side>,
    pub ticks: u32,
    /// Territory held by host and challenger at the end.
    pub final_territory: [usize; 2],
    pub initial_board: Vec<Option<i8>>,
    pub history: Vec<TickRecord>,
}

/// Aggregate statistics over a batch of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub host_wins: usize,
    pub challenger_wins: usize,
    pub unfinished: usize,
    pub avg_ticks: f64,
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game to completion or until `max_ticks`.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    play_game_on(Topology::standard(), config, game_id, rng)
}

/// Plays one game on `topology`.
///
/// A board without room for both fortresses is recorded as an unplayed game.
fn play_game_on(
    topology: Arc<Topology>,
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> GameRecord {
    let mut board = Board::empty(topology);
    if board.place_fortresses(rng).is_none() {
        warn!(game_id, "board has no room for two fortresses; skipping game");
        return GameRecord {
            game_id,
            winner: None,
            ticks: 0,
            final_territory: [0, 0],
            initial_board: board.snapshot(),
            history: Vec::new(),
        };
    }
    let initial_board = board.snapshot();

    let mut game = Match::new(
        format!("G{:03}", game_id),
        "host".to_string(),
        "challenger".to_string(),
        board,
        0,
        TICK_MS,
        SmallRng::seed_from_u64(rng.gen()),
    );
    game.start(0);

    let mut history = Vec::new();
    let mut tick = 0;
    while !game.game_over && tick < config.max_ticks {
        for side in ALL_SIDES {
            let player = match side {
                Side::Host => game.host_id.clone(),
                Side::Challenger => game.challenger_id.clone(),
            };
            if let Some(mv) = random_move(&game.board, side, rng) {
                if let Err(err) = game.submit(&player, mv.index, mv.kind) {
                    warn!(game_id, side = %side, error = %err, "generated move was rejected");
                }
            }
        }

        let now = game.next_tick_at;
        match game.tick(now) {
            Ok(report) => {
                tick += 1;
                history.push(TickRecord {
                    tick,
                    resolved: report.resolved,
                    board: game.board.snapshot(),
                });
            }
            Err(err) => {
                warn!(game_id, error = %err, "tick resolution failed; abandoning game");
                break;
            }
        }
    }

    GameRecord {
        game_id,
        winner: game.winner,
        ticks: tick,
        final_territory: [
            game.board.territory(Side::Host),
            game.board.territory(Side::Challenger),
        ],
        initial_board,
        history,
    }
}

/// Runs self-play generation and returns all game records in game order.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    if config.threads > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
        {
            Ok(pool) => return run_self_play_parallel(config, &pool),
            Err(err) => warn!(error = %err, "failed to build thread pool; playing sequentially"),
        }
    }
    run_self_play_sequential(config)
}

fn run_self_play_sequential(config: &SelfPlayConfig) -> Vec<GameRecord> {
    (0..config.num_games)
        .map(|i| play_logged(config, i))
        .collect()
}

fn run_self_play_parallel(config: &SelfPlayConfig, pool: &rayon::ThreadPool) -> Vec<GameRecord> {
    use rayon::prelude::*;

    pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| play_logged(config, i))
            .collect()
    })
}

fn play_logged(config: &SelfPlayConfig, game_id: usize) -> GameRecord {
    let started = Instant::now();
    let mut rng = game_rng(config.seed, game_id);
    let game = play_game(config, game_id, &mut rng);
    if !config.quiet {
        let outcome = match game.winner {
            Some(side) => format!("{} wins", side),
            None => "unfinished".to_string(),
        };
        info!(
            game = game_id + 1,
            of = config.num_games,
            ticks = game.ticks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{}",
            outcome
        );
    }
    game
}

/// Writes games as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        ..Summary::default()
    };
    let mut total_ticks = 0u64;
    for game in games {
        total_ticks += u64::from(game.ticks);
        match game.winner {
            Some(Side::Host) => summary.host_wins += 1,
            Some(Side::Challenger) => summary.challenger_wins += 1,
            None => summary.unfinished += 1,
        }
    }
    summary.avg_ticks = total_ticks as f64 / games.len().max(1) as f64;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_games: usize, threads: usize, seed: u64) -> SelfPlayConfig {
        SelfPlayConfig {
            num_games,
            threads,
            seed,
            max_ticks: 300,
            quiet: true,
        }
    }

    #[test]
    fn play_single_game_completes() {
        let config = config(1, 1, 42);
        let mut rng = SmallRng::seed_from_u64(42);
        let game = play_game(&config, 0, &mut rng);

        assert!(game.ticks > 0);
        assert!(game.ticks <= config.max_ticks);
        assert_eq!(game.history.len() as u32, game.ticks);
        assert_eq!(game.initial_board.iter().filter(|v| **v == Some(1)).count(), 1);
        if let Some(winner) = game.winner {
            assert_eq!(game.final_territory[1 - winner_slot(winner)], 0);
        }
    }

    fn winner_slot(side: Side) -> usize {
        match side {
            Side::Host => 0,
            Side::Challenger => 1,
        }
    }

    #[test]
    fn board_without_room_for_fortresses_is_not_played() {
        let topology = Topology::hex(1, 1, &[true]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let game = play_game_on(Arc::new(topology), &config(1, 1, 3), 5, &mut rng);

        assert_eq!(game.game_id, 5);
        assert_eq!(game.ticks, 0);
        assert!(game.winner.is_none());
        assert!(game.history.is_empty());
        assert_eq!(game.initial_board, vec![Some(0)]);
        assert_eq!(summarize(&[game]).unfinished, 1);
    }

    #[test]
    fn boards_stay_in_range() {
        let config = config(1, 1, 9);
        let mut rng = SmallRng::seed_from_u64(9);
        let game = play_game(&config, 0, &mut rng);
        for record in &game.history {
            assert_eq!(record.board.len(), 49);
            for value in record.board.iter().flatten() {
                assert!((-2..=2).contains(value));
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = run_self_play(&config(3, 1, 7));
        let b = run_self_play(&config(3, 2, 7));
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.game_id, y.game_id);
            assert_eq!(x.winner, y.winner);
            assert_eq!(x.ticks, y.ticks);
            assert_eq!(x.initial_board, y.initial_board);
        }
    }

    #[test]
    fn parallel_run_produces_correct_count() {
        let games = run_self_play(&config(4, 2, 77));
        assert_eq!(games.len(), 4);
        let ids: Vec<usize> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_self_play(&config(2, 1, 55));
        let mut out = Vec::new();
        write_jsonl(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["game_id"].is_u64());
            assert!(value["history"].is_array());
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let games = run_self_play(&config(3, 1, 5));
        let summary = summarize(&games);
        assert_eq!(summary.games, 3);
        assert_eq!(
            summary.host_wins + summary.challenger_wins + summary.unfinished,
            3
        );
        assert!(summary.avg_ticks > 0.0);
    }
}
