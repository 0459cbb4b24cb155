//! Win detection.

use crate::board::{Board, Side};

/// Returns the winner if either side has lost all its territory.
///
/// The host is checked first, so when both sides are wiped out in the same
/// tick the challenger wins.
pub fn winner(board: &Board) -> Option<Side> {
    if !board.has_territory(Side::Host) {
        return Some(Side::Challenger);
    }
    if !board.has_territory(Side::Challenger) {
        return Some(Side::Host);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cells: &[(usize, i8)]) -> Board {
        let mut board = Board::standard();
        for &(i, v) in cells {
            board.set_strength(i, v);
        }
        board
    }

    #[test]
    fn both_sides_alive_has_no_winner() {
        assert_eq!(winner(&board_with(&[(1, 1), (40, -2)])), None);
    }

    #[test]
    fn host_eliminated() {
        assert_eq!(winner(&board_with(&[(40, -1)])), Some(Side::Challenger));
    }

    #[test]
    fn challenger_eliminated() {
        assert_eq!(winner(&board_with(&[(1, 2), (2, 1)])), Some(Side::Host));
    }

    #[test]
    fn mutual_elimination_goes_to_challenger() {
        assert_eq!(winner(&Board::standard()), Some(Side::Challenger));
    }
}
