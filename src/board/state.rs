//! Board state.
//!
//! A fixed-length sequence of cells laid out on a shared [`Topology`].
//! Which cells are in play is decided at construction and never changes;
//! only the strengths of playable cells are mutated.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Serialize, Serializer};

use super::cell::{Cell, Side, MAX_STRENGTH};
use super::topology::Topology;

/// Complete board state for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
    topology: Arc<Topology>,
}

impl Board {
    /// Creates a board with every playable cell unclaimed.
    pub fn empty(topology: Arc<Topology>) -> Self {
        let cells = (0..topology.len())
            .map(|i| {
                if topology.is_playable(i) {
                    Cell::EMPTY
                } else {
                    Cell::OutOfPlay
                }
            })
            .collect();
        Board { cells, topology }
    }

    /// Creates an empty board on the standard topology.
    pub fn standard() -> Self {
        Board::empty(Topology::standard())
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Sets the strength of a playable cell, clamped to the legal range.
    /// Returns false (and changes nothing) for out-of-play or out-of-range cells.
    pub fn set_strength(&mut self, index: usize, value: i8) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if cell.is_playable() => {
                *cell = Cell::Playable(value.clamp(-MAX_STRENGTH, MAX_STRENGTH));
                true
            }
            _ => false,
        }
    }

    /// Number of cells owned by `side`.
    pub fn territory(&self, side: Side) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(side)).count()
    }

    /// Returns true if `side` owns at least one cell anywhere on the board.
    pub fn has_territory(&self, side: Side) -> bool {
        self.cells.iter().any(|c| c.is_owned_by(side))
    }

    /// Returns true if any neighbour of `index` is owned by `side`.
    pub fn has_friendly_neighbor(&self, index: usize, side: Side) -> bool {
        self.topology
            .neighbors(index)
            .iter()
            .any(|&n| self.cells[n].is_owned_by(side))
    }

    /// Places one fortress per side at two distinct random playable cells.
    ///
    /// Fortresses start at unit strength. Returns the (host, challenger)
    /// indices, or `None` when the board has fewer than two playable cells.
    pub fn place_fortresses(&mut self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        let playable: Vec<usize> = self.topology.playable_indices().collect();
        let mut picks = playable.choose_multiple(rng, 2);
        let host = *picks.next()?;
        let challenger = *picks.next()?;
        self.set_strength(host, Side::Host.sign());
        self.set_strength(challenger, Side::Challenger.sign());
        Some((host, challenger))
    }

    /// Board snapshot as nullable strengths, in index order.
    pub fn snapshot(&self) -> Vec<Option<i8>> {
        self.cells.iter().map(|c| c.strength()).collect()
    }
}

/// Serializes as the plain cell sequence.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cells.serialize(serializer)
    }
}
