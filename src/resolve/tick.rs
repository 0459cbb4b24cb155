//! Simultaneous tick resolution.
//!
//! Both sides' pending moves are visible at once and applied in a fixed
//! order (host, then challenger). Each applied move triggers combat against
//! the vulnerable enemy cells around it. The only randomness is the
//! neutralization roll after a claim, drawn from the match's own source.

use rand::Rng;
use serde::Serialize;

use crate::board::{Board, Move, MoveType, Side, ALL_SIDES, MAX_STRENGTH};
use crate::game::{Match, Millis, PendingMoves};
use crate::movegen::check_move;

use super::outcome::winner;

/// Chance that a claim neutralizes each adjacent vulnerable enemy cell.
pub const CLAIM_NEUTRALIZE_PROBABILITY: f64 = 0.5;

/// Errors that abort resolution of a single match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("pending {side} move targets cell {index} but the board has {len} cells")]
    IndexOutOfRange { side: Side, index: usize, len: usize },
}

/// What happened to a pending move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Applied,
    /// An earlier move in the same tick made this one illegal.
    Skipped,
}

/// A pending move paired with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMove {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
    pub outcome: MoveOutcome,
    /// Enemy cells reset to unclaimed by this move's combat.
    pub neutralized: Vec<usize>,
}

/// Summary of one resolved tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub resolved: Vec<ResolvedMove>,
    pub idle: bool,
    pub winner: Option<Side>,
}

/// Applies both sides' pending moves to the board, host first.
///
/// All indices are checked before anything is mutated, so an error leaves
/// the board untouched.
pub fn apply_moves(
    board: &mut Board,
    pending: &PendingMoves,
    rng: &mut impl Rng,
) -> Result<Vec<ResolvedMove>, ResolveError> {
    for side in ALL_SIDES {
        if let Some(mv) = pending.get(side) {
            if mv.index >= board.len() {
                return Err(ResolveError::IndexOutOfRange {
                    side,
                    index: mv.index,
                    len: board.len(),
                });
            }
        }
    }

    let mut resolved = Vec::with_capacity(2);
    for side in ALL_SIDES {
        if let Some(mv) = pending.get(side) {
            resolved.push(apply_move(board, side, mv, rng));
        }
    }
    Ok(resolved)
}

fn apply_move(board: &mut Board, side: Side, mv: Move, rng: &mut impl Rng) -> ResolvedMove {
    if check_move(board, side, mv).is_err() {
        return ResolvedMove {
            side,
            mv,
            outcome: MoveOutcome::Skipped,
            neutralized: Vec::new(),
        };
    }

    let current = board.get(mv.index).and_then(|c| c.strength()).unwrap_or(0);
    let updated = match mv.kind {
        MoveType::Claim => side.sign(),
        MoveType::Defend => (current + side.sign()).clamp(-MAX_STRENGTH, MAX_STRENGTH),
    };
    board.set_strength(mv.index, updated);

    let pressure = updated.abs();
    let enemy = side.opponent();
    let neighbors = board.topology().neighbors(mv.index).to_vec();
    let mut neutralized = Vec::new();

    for n in neighbors {
        let Some(cell) = board.get(n) else { continue };
        if !cell.is_owned_by(enemy) || cell.magnitude() != 1 {
            continue;
        }
        let hit = match mv.kind {
            MoveType::Claim => rng.gen_bool(CLAIM_NEUTRALIZE_PROBABILITY),
            MoveType::Defend => pressure > cell.magnitude(),
        };
        if hit {
            board.set_strength(n, 0);
            neutralized.push(n);
        }
    }

    ResolvedMove {
        side,
        mv,
        outcome: MoveOutcome::Applied,
        neutralized,
    }
}

/// Resolves one tick of `game` at time `now`.
///
/// Pending moves are consumed and the next tick is scheduled even when
/// resolution fails, so a bad intent cannot wedge the match.
pub fn resolve_tick(game: &mut Match, now: Millis) -> Result<TickReport, ResolveError> {
    let pending = std::mem::take(&mut game.pending);
    let idle = pending.is_empty();
    game.next_tick_at = now.saturating_add(game.tick_ms);

    let resolved = apply_moves(&mut game.board, &pending, &mut game.rng)?;

    let winner = winner(&game.board);
    if let Some(side) = winner {
        game.game_over = true;
        game.winner = Some(side);
        game.finished_at = Some(now);
    }

    game.idle_ticks = if idle { game.idle_ticks.saturating_add(1) } else { 0 };

    Ok(TickReport {
        resolved,
        idle,
        winner,
    })
}
