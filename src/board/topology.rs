//! Adjacency graph for hexagonal boards.
//!
//! Boards are laid out in staggered columns: even columns sit half a cell
//! lower than odd columns, so the diagonal neighbours of a cell depend on the
//! parity of its column. The graph is derived once from the board shape and
//! is immutable afterwards. Cells are indexed column-major
//! (`col * height + row`).

use std::sync::{Arc, OnceLock};

/// Number of columns on the standard board.
pub const STANDARD_WIDTH: usize = 7;

/// Number of rows on the standard board.
pub const STANDARD_HEIGHT: usize = 7;

/// Total number of cells (playable or not) on the standard board.
pub const STANDARD_CELL_COUNT: usize = STANDARD_WIDTH * STANDARD_HEIGHT;

/// Shorthand mask aliases.
const X: bool = false;
const O: bool = true;

/// Playable mask for the standard board, one column per line.
#[rustfmt::skip]
pub static STANDARD_MASK: [bool; STANDARD_CELL_COUNT] = [
    X, O, O, O, O, X, X,
    X, O, O, O, O, O, X,
    O, O, O, O, O, O, X,
    O, O, O, O, O, O, O,
    O, O, O, O, O, O, X,
    X, O, O, O, O, O, X,
    X, O, O, O, O, X, X,
];

/// (column, row) offsets for cells in even columns.
const EVEN_COLUMN_OFFSETS: [(isize, isize); 6] =
    [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// (column, row) offsets for cells in odd columns.
const ODD_COLUMN_OFFSETS: [(isize, isize); 6] =
    [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)];

/// Errors raised when a board shape cannot be turned into a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("board must have at least one column and one row")]
    Empty,
    #[error("mask has {actual} cells, expected {expected} for a {width}x{height} board")]
    MaskSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Board geometry plus the precomputed neighbour lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    width: usize,
    height: usize,
    playable: Vec<bool>,
    neighbors: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds the adjacency graph for a `width` x `height` hex board.
    pub fn hex(width: usize, height: usize, playable: &[bool]) -> Result<Self, TopologyError> {
        if width == 0 || height == 0 {
            return Err(TopologyError::Empty);
        }
        let expected = width * height;
        if playable.len() != expected {
            return Err(TopologyError::MaskSize {
                width,
                height,
                expected,
                actual: playable.len(),
            });
        }
        Ok(Self::build(width, height, playable.to_vec()))
    }

    /// Returns the shared topology of the standard 7x7 board.
    ///
    /// Built on first use; every later call hands out the same graph.
    pub fn standard() -> Arc<Topology> {
        static STANDARD: OnceLock<Arc<Topology>> = OnceLock::new();
        let topology = STANDARD.get_or_init(|| {
            Arc::new(Topology::build(
                STANDARD_WIDTH,
                STANDARD_HEIGHT,
                STANDARD_MASK.to_vec(),
            ))
        });
        Arc::clone(topology)
    }

    fn build(width: usize, height: usize, playable: Vec<bool>) -> Self {
        let mut neighbors = vec![Vec::new(); playable.len()];

        for (idx, cell_neighbors) in neighbors.iter_mut().enumerate() {
            if !playable[idx] {
                continue;
            }
            let col = (idx / height) as isize;
            let row = (idx % height) as isize;
            let offsets = if col % 2 == 0 {
                &EVEN_COLUMN_OFFSETS
            } else {
                &ODD_COLUMN_OFFSETS
            };

            for &(dc, dr) in offsets {
                let (c, r) = (col + dc, row + dr);
                if c < 0 || r < 0 || c >= width as isize || r >= height as isize {
                    continue;
                }
                let n = c as usize * height + r as usize;
                if playable[n] {
                    cell_neighbors.push(n);
                }
            }
        }

        Topology {
            width,
            height,
            playable,
            neighbors,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells, including out-of-play ones.
    pub fn len(&self) -> usize {
        self.playable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playable.is_empty()
    }

    /// Returns true if `index` is on the board and in play.
    pub fn is_playable(&self, index: usize) -> bool {
        self.playable.get(index).copied().unwrap_or(false)
    }

    /// Iterates over the indices of all playable cells in index order.
    pub fn playable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.playable
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| p.then_some(i))
    }

    /// Neighbours of `index`, in up/down/left/right-column order.
    /// Empty for out-of-play or out-of-range indices.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Converts a cell index to `(column, row)`.
    pub fn coords(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.len()).then(|| (index / self.height, index % self.height))
    }

    /// Converts `(column, row)` to a cell index.
    pub fn index_of(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| col * self.height + row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_has_37_playable_cells() {
        let topo = Topology::standard();
        assert_eq!(topo.len(), STANDARD_CELL_COUNT);
        assert_eq!(topo.playable_indices().count(), 37);
    }

    #[test]
    fn standard_topology_is_shared() {
        let a = Topology::standard();
        let b = Topology::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let topo = Topology::standard();
        for a in topo.playable_indices() {
            for &b in topo.neighbors(a) {
                assert!(
                    topo.is_adjacent(b, a),
                    "{} lists {} as a neighbour but not vice versa",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn no_cell_neighbours_itself_or_out_of_play_cells() {
        let topo = Topology::standard();
        for a in topo.playable_indices() {
            let ns = topo.neighbors(a);
            assert!(!ns.contains(&a));
            assert!(ns.len() <= 6);
            assert!(ns.iter().all(|&n| topo.is_playable(n)));
        }
    }

    #[test]
    fn odd_column_centre_has_six_neighbours() {
        let topo = Topology::standard();
        // (3, 3)
        assert_eq!(topo.neighbors(24), &[23, 25, 16, 17, 30, 31]);
    }

    #[test]
    fn even_column_cell_uses_lower_diagonals() {
        let topo = Topology::standard();
        // (2, 3)
        assert_eq!(topo.neighbors(17), &[16, 18, 10, 11, 24, 25]);
    }

    #[test]
    fn edge_cell_skips_out_of_play_and_off_board() {
        let topo = Topology::standard();
        // (0, 1): (0, 0) is out of play and there is no column to the left.
        assert_eq!(topo.neighbors(1), &[2, 8, 9]);
    }

    #[test]
    fn out_of_play_cells_have_no_neighbours() {
        let topo = Topology::standard();
        assert!(!topo.is_playable(0));
        assert!(topo.neighbors(0).is_empty());
        assert!(topo.neighbors(999).is_empty());
    }

    #[test]
    fn coords_roundtrip() {
        let topo = Topology::standard();
        assert_eq!(topo.coords(24), Some((3, 3)));
        assert_eq!(topo.index_of(3, 3), Some(24));
        assert_eq!(topo.coords(49), None);
        assert_eq!(topo.index_of(7, 0), None);
    }

    #[test]
    fn rejects_mismatched_mask() {
        let err = Topology::hex(3, 3, &[true; 8]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::MaskSize {
                width: 3,
                height: 3,
                expected: 9,
                actual: 8
            }
        );
        assert_eq!(Topology::hex(0, 3, &[]).unwrap_err(), TopologyError::Empty);
    }

    #[test]
    fn small_full_board_is_symmetric() {
        let topo = Topology::hex(4, 3, &[true; 12]).unwrap();
        for a in topo.playable_indices() {
            for &b in topo.neighbors(a) {
                assert!(topo.is_adjacent(b, a));
            }
        }
    }
}
