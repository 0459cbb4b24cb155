//! Move intents.
//!
//! A player submits at most one move per tick: claim an unclaimed cell, or
//! defend (fortify) a cell it already owns.

use serde::{Deserialize, Serialize};

/// The kind of move a player can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    Claim,
    Defend,
}

impl MoveType {
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveType::Claim => "claim",
            MoveType::Defend => "defend",
        }
    }

    /// Parses a move type from its wire name.
    pub fn parse(s: &str) -> Option<MoveType> {
        match s {
            "claim" => Some(MoveType::Claim),
            "defend" => Some(MoveType::Defend),
            _ => None,
        }
    }
}

/// A move targeting a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: MoveType,
}

impl Move {
    pub fn claim(index: usize) -> Self {
        Move {
            index,
            kind: MoveType::Claim,
        }
    }

    pub fn defend(index: usize) -> Self {
        Move {
            index,
            kind: MoveType::Defend,
        }
    }
}
