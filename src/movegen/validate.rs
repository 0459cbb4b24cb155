//! Move validation.
//!
//! Checks a submitted intent against the current match state. Checks run in
//! a fixed order and stop at the first failure, so a move on a finished match
//! always reports `GameOver` even if it is also malformed.

use crate::board::{Board, Move, MoveType, Side};
use crate::game::Match;

/// Reasons a move is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the match is over")]
    GameOver,
    #[error("player is not part of this match")]
    Unauthorized,
    #[error("cell is off the board or out of play")]
    InvalidCell,
    #[error("cell is already claimed")]
    CellOccupied,
    #[error("claim must border friendly territory")]
    NotAdjacentToFriendly,
    #[error("can only defend your own territory")]
    NotOwnTerritory,
}

impl MoveError {
    /// Stable machine-readable reason code.
    pub const fn reason(self) -> &'static str {
        match self {
            MoveError::GameOver => "game_over",
            MoveError::Unauthorized => "unauthorized",
            MoveError::InvalidCell => "invalid_cell",
            MoveError::CellOccupied => "cell_occupied",
            MoveError::NotAdjacentToFriendly => "not_adjacent_to_friendly",
            MoveError::NotOwnTerritory => "not_own_territory",
        }
    }
}

/// Validates a move submitted by `player_id` and returns the acting side.
pub fn validate(
    game: &Match,
    player_id: &str,
    index: usize,
    kind: MoveType,
) -> Result<Side, MoveError> {
    if game.game_over {
        return Err(MoveError::GameOver);
    }
    let side = game.side_of(player_id).ok_or(MoveError::Unauthorized)?;
    check_move(&game.board, side, Move { index, kind })?;
    Ok(side)
}

/// Checks the board-level rules for a move by `side`.
///
/// Used both at submission time and when a pending move is applied, since an
/// earlier move in the same tick can invalidate a later one.
pub fn check_move(board: &Board, side: Side, mv: Move) -> Result<(), MoveError> {
    let cell = board
        .get(mv.index)
        .filter(|c| c.is_playable())
        .ok_or(MoveError::InvalidCell)?;

    match mv.kind {
        MoveType::Claim => {
            if cell.owner().is_some() {
                return Err(MoveError::CellOccupied);
            }
            // A side with no territory may claim anywhere.
            if board.has_territory(side) && !board.has_friendly_neighbor(mv.index, side) {
                return Err(MoveError::NotAdjacentToFriendly);
            }
        }
        MoveType::Defend => {
            if !cell.is_owned_by(side) {
                return Err(MoveError::NotOwnTerritory);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Match;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn game_with(board: Board) -> Match {
        Match::new(
            "ABCD".to_string(),
            "host-id".to_string(),
            "challenger-id".to_string(),
            board,
            0,
            5_000,
            SmallRng::seed_from_u64(3),
        )
    }

    fn board_with(cells: &[(usize, i8)]) -> Board {
        let mut board = Board::standard();
        for &(i, v) in cells {
            board.set_strength(i, v);
        }
        board
    }

    #[test]
    fn game_over_is_checked_first() {
        let mut game = game_with(board_with(&[(24, 1)]));
        game.game_over = true;
        assert_eq!(
            validate(&game, "stranger", 0, MoveType::Claim),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn unknown_player_is_unauthorized() {
        let game = game_with(board_with(&[(24, 1)]));
        assert_eq!(
            validate(&game, "stranger", 23, MoveType::Claim),
            Err(MoveError::Unauthorized)
        );
    }

    #[test]
    fn out_of_play_and_out_of_range_cells_are_invalid() {
        let game = game_with(board_with(&[(24, 1)]));
        assert_eq!(
            validate(&game, "host-id", 0, MoveType::Claim),
            Err(MoveError::InvalidCell)
        );
        assert_eq!(
            validate(&game, "host-id", 49, MoveType::Defend),
            Err(MoveError::InvalidCell)
        );
    }

    #[test]
    fn claim_on_owned_cell_is_rejected() {
        let game = game_with(board_with(&[(24, 1), (25, -1), (23, 2)]));
        for idx in [23, 24, 25] {
            assert_eq!(
                validate(&game, "host-id", idx, MoveType::Claim),
                Err(MoveError::CellOccupied)
            );
            assert_eq!(
                validate(&game, "challenger-id", idx, MoveType::Claim),
                Err(MoveError::CellOccupied)
            );
        }
    }

    #[test]
    fn claim_requires_adjacency_once_territory_exists() {
        let game = game_with(board_with(&[(24, 1), (45, -1)]));
        assert_eq!(validate(&game, "host-id", 23, MoveType::Claim), Ok(Side::Host));
        assert_eq!(
            validate(&game, "host-id", 2, MoveType::Claim),
            Err(MoveError::NotAdjacentToFriendly)
        );
    }

    #[test]
    fn first_claim_without_territory_needs_no_adjacency() {
        let game = game_with(board_with(&[(24, 1)]));
        assert_eq!(
            validate(&game, "challenger-id", 2, MoveType::Claim),
            Ok(Side::Challenger)
        );

        let mut board = game.board.clone();
        board.set_strength(2, -1);
        let game = game_with(board);
        assert_eq!(
            validate(&game, "challenger-id", 40, MoveType::Claim),
            Err(MoveError::NotAdjacentToFriendly)
        );
    }

    #[test]
    fn defend_requires_own_territory() {
        let game = game_with(board_with(&[(24, 1), (25, -1)]));
        assert_eq!(validate(&game, "host-id", 24, MoveType::Defend), Ok(Side::Host));
        assert_eq!(
            validate(&game, "host-id", 25, MoveType::Defend),
            Err(MoveError::NotOwnTerritory)
        );
        assert_eq!(
            validate(&game, "host-id", 23, MoveType::Defend),
            Err(MoveError::NotOwnTerritory)
        );
        assert_eq!(
            validate(&game, "challenger-id", 25, MoveType::Defend),
            Ok(Side::Challenger)
        );
    }

    #[test]
    fn fortified_cells_can_still_be_defended() {
        let game = game_with(board_with(&[(24, 2)]));
        assert_eq!(validate(&game, "host-id", 24, MoveType::Defend), Ok(Side::Host));
    }

    #[test]
    fn reason_codes_are_snake_case() {
        assert_eq!(MoveError::NotAdjacentToFriendly.reason(), "not_adjacent_to_friendly");
        assert_eq!(MoveError::GameOver.to_string(), "the match is over");
    }
}
