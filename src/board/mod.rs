//! Board representation.
//!
//! Contains the hex topology, cell contents, move intents, and the board
//! state that resolution mutates.

pub mod cell;
pub mod order;
pub mod state;
pub mod topology;

pub use cell::{Cell, Side, ALL_SIDES, MAX_STRENGTH};
pub use order::{Move, MoveType};
pub use state::Board;
pub use topology::{
    Topology, TopologyError, STANDARD_CELL_COUNT, STANDARD_HEIGHT, STANDARD_MASK, STANDARD_WIDTH,
};
