use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use hexfront::board::{
    Board, Move, MoveType, Side, Topology, STANDARD_HEIGHT, STANDARD_MASK, STANDARD_WIDTH,
};
use hexfront::config::EngineConfig;
use hexfront::game::PendingMoves;
use hexfront::movegen::{check_move, legal_moves};
use hexfront::registry::MatchRegistry;
use hexfront::resolve::apply_moves;
use hexfront::selfplay::{play_game, SelfPlayConfig};

/// A mid-game position: two fronts meeting in the middle of the board.
fn contested_board() -> Board {
    let mut board = Board::standard();
    let cells = [
        (16, 2),
        (17, 1),
        (23, 1),
        (24, 1),
        (25, -1),
        (31, -1),
        (32, -2),
        (38, -1),
    ];
    for (index, value) in cells {
        board.set_strength(index, value);
    }
    board
}

fn bench_topology_build(c: &mut Criterion) {
    c.bench_function("topology_build_standard", |b| {
        b.iter(|| {
            Topology::hex(
                black_box(STANDARD_WIDTH),
                black_box(STANDARD_HEIGHT),
                black_box(&STANDARD_MASK),
            )
        })
    });
}

fn bench_check_move(c: &mut Criterion) {
    let board = contested_board();
    c.bench_function("check_move_claim", |b| {
        b.iter(|| check_move(black_box(&board), Side::Host, black_box(Move::claim(18))))
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    let board = contested_board();
    c.bench_function("legal_moves_contested", |b| {
        b.iter(|| legal_moves(black_box(&board), black_box(Side::Challenger)))
    });
}

fn bench_apply_moves(c: &mut Criterion) {
    let board = contested_board();
    let pending = PendingMoves {
        host: Some(Move {
            index: 24,
            kind: MoveType::Defend,
        }),
        challenger: Some(Move::claim(30)),
    };
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("apply_moves_both_sides", |b| {
        b.iter(|| {
            let mut board = board.clone();
            apply_moves(&mut board, black_box(&pending), &mut rng)
        })
    });
}

fn bench_run_due(c: &mut Criterion) {
    let (registry, events) = MatchRegistry::new(EngineConfig {
        idle_tick_limit: u32::MAX,
        seed: 3,
        ..EngineConfig::default()
    });
    // Undelivered state updates would pile up for the whole run.
    drop(events);
    for _ in 0..256 {
        if let Ok(created) = registry.create_at(0) {
            let _ = registry.join_at(&created.code, 0);
        }
    }
    let mut now = 0;
    c.bench_function("run_due_256_matches", |b| {
        b.iter(|| {
            now += 5_000;
            registry.run_due(black_box(now))
        })
    });
}

fn bench_selfplay_game(c: &mut Criterion) {
    let config = SelfPlayConfig {
        num_games: 1,
        threads: 1,
        seed: 21,
        max_ticks: 200,
        quiet: true,
    };
    c.bench_function("selfplay_single_game", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(21);
            play_game(black_box(&config), 0, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_topology_build,
    bench_check_move,
    bench_legal_moves,
    bench_apply_moves,
    bench_run_due,
    bench_selfplay_game,
);
criterion_main!(benches);
