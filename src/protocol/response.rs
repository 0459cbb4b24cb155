//! Console responses.
//!
//! Every response is a single JSON object tagged with `"type"`.

use serde::Serialize;

use crate::game::MatchView;
use crate::registry::{AcceptedMove, CreatedMatch, JoinedMatch, RegistryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Created(CreatedMatch),
    Joined(JoinedMatch),
    Accepted(AcceptedMove),
    Rejected { reason: &'static str, message: String },
    Sync(MatchView),
    Count { active: usize },
    Error { message: String },
}

impl Response {
    pub fn error(message: impl ToString) -> Self {
        Response::Error {
            message: message.to_string(),
        }
    }

    /// Encodes the response as one line of JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"type":"error","message":"failed to encode response: {}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }
}

impl From<RegistryError> for Response {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Move(reason) => Response::Rejected {
                reason: reason.reason(),
                message: reason.to_string(),
            },
            other => Response::error(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Side};
    use crate::movegen::MoveError;

    #[test]
    fn count_is_tagged() {
        let json = Response::Count { active: 3 }.to_json();
        assert_eq!(json, r#"{"type":"count","active":3}"#);
    }

    #[test]
    fn accepted_flattens_move_fields() {
        let json = serde_json::to_value(Response::Accepted(AcceptedMove {
            side: Side::Challenger,
            mv: Move::claim(12),
            next_tick_time: 5_000,
        }))
        .unwrap();
        assert_eq!(json["type"], "accepted");
        assert_eq!(json["side"], "challenger");
        assert_eq!(json["move"]["index"], 12);
        assert_eq!(json["move"]["type"], "claim");
        assert_eq!(json["next_tick_time"], 5_000);
    }

    #[test]
    fn move_errors_become_rejections() {
        let response = Response::from(RegistryError::Move(MoveError::NotOwnTerritory));
        assert_eq!(
            response,
            Response::Rejected {
                reason: "not_own_territory",
                message: MoveError::NotOwnTerritory.to_string(),
            }
        );
    }

    #[test]
    fn other_registry_errors_become_errors() {
        let json = serde_json::to_value(Response::from(RegistryError::NotFound(
            "ABCD".to_string(),
        )))
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "no match with code ABCD");
    }
}
