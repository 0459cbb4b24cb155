//! Legal move generation and validation.
//!
//! `validate` is the gate every submitted intent passes through; the
//! generators enumerate the moves that gate would accept for a side.

pub mod validate;

pub use validate::{check_move, validate, MoveError};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Move, MoveType, Side};

/// Returns every move `side` could legally submit on `board`.
///
/// Claims come first in index order, then defends in index order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let topology = board.topology();
    let mut moves = Vec::new();

    for kind in [MoveType::Claim, MoveType::Defend] {
        for index in topology.playable_indices() {
            let mv = Move { index, kind };
            if check_move(board, side, mv).is_ok() {
                moves.push(mv);
            }
        }
    }

    moves
}

/// Picks a uniformly random legal move for `side`, or `None` if it has none.
pub fn random_move(board: &Board, side: Side, rng: &mut impl Rng) -> Option<Move> {
    legal_moves(board, side).choose(rng).copied()
}
