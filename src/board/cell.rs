//! Sides and cell contents.
//!
//! A playable cell holds a signed strength: positive for the host, negative
//! for the challenger, zero when unclaimed. Magnitude 1 is a claimed cell,
//! magnitude 2 a fortified one.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Largest magnitude a cell can reach.
pub const MAX_STRENGTH: i8 = 2;

/// One of the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Host,
    Challenger,
}

/// Both sides, in resolution order.
pub const ALL_SIDES: [Side; 2] = [Side::Host, Side::Challenger];

impl Side {
    /// Unit strength for this side: +1 for the host, -1 for the challenger.
    pub const fn sign(self) -> i8 {
        match self {
            Side::Host => 1,
            Side::Challenger => -1,
        }
    }

    pub const fn opponent(self) -> Side {
        match self {
            Side::Host => Side::Challenger,
            Side::Challenger => Side::Host,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Side::Host => "host",
            Side::Challenger => "challenger",
        }
    }

    /// Returns the owner of a strength value, or `None` when it is zero.
    pub fn from_strength(value: i8) -> Option<Side> {
        match value.signum() {
            1 => Some(Side::Host),
            -1 => Some(Side::Challenger),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    OutOfPlay,
    Playable(i8),
}

impl Cell {
    /// An unclaimed playable cell.
    pub const EMPTY: Cell = Cell::Playable(0);

    pub fn is_playable(self) -> bool {
        matches!(self, Cell::Playable(_))
    }

    pub fn strength(self) -> Option<i8> {
        match self {
            Cell::Playable(v) => Some(v),
            Cell::OutOfPlay => None,
        }
    }

    pub fn owner(self) -> Option<Side> {
        self.strength().and_then(Side::from_strength)
    }

    pub fn magnitude(self) -> i8 {
        self.strength().map_or(0, i8::abs)
    }

    pub fn is_owned_by(self, side: Side) -> bool {
        self.owner() == Some(side)
    }
}

/// Serializes as `null` for out-of-play cells and the strength otherwise.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::OutOfPlay => serializer.serialize_none(),
            Cell::Playable(v) => serializer.serialize_some(v),
        }
    }
}
