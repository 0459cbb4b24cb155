//! Notifications published for match observers.

use serde::Serialize;

use crate::board::{Move, Side};
use crate::game::MatchView;
use crate::resolve::ResolvedMove;

/// An event the transport layer broadcasts to everyone watching a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A move was accepted and is waiting for the next tick.
    MovePreview {
        code: String,
        side: Side,
        #[serde(rename = "move")]
        mv: Move,
    },
    /// A tick was resolved.
    StateUpdate {
        code: String,
        state: MatchView,
        resolved: Vec<ResolvedMove>,
    },
    /// The match was evicted after too many idle ticks.
    MatchTimeout { code: String },
}

impl MatchEvent {
    pub fn code(&self) -> &str {
        match self {
            MatchEvent::MovePreview { code, .. }
            | MatchEvent::StateUpdate { code, .. }
            | MatchEvent::MatchTimeout { code } => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged() {
        let event = MatchEvent::MovePreview {
            code: "ABCD".to_string(),
            side: Side::Host,
            mv: Move::claim(3),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "move_preview");
        assert_eq!(json["side"], "host");
        assert_eq!(json["move"]["index"], 3);
        assert_eq!(event.code(), "ABCD");

        let json = serde_json::to_value(MatchEvent::MatchTimeout {
            code: "WXYZ".to_string(),
        })
        .unwrap();
        assert_eq!(json["event"], "match_timeout");
        assert_eq!(json["code"], "WXYZ");
    }
}
