//! Console command parser.
//!
//! Parses one line of input into a structured `Command` that the console
//! loop dispatches against the registry.

use crate::board::MoveType;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a match: `create`
    Create,

    /// Join a match as the challenger: `join <code>`
    Join { code: String },

    /// Submit a move: `move <code> <player> <index> <claim|defend>`
    Move {
        code: String,
        player_id: String,
        index: usize,
        kind: MoveType,
    },

    /// Fetch the current state: `sync <code>`
    Sync { code: String },

    /// Count live matches: `count`
    Count,

    /// Stop the console loop: `quit`
    Quit,
}

/// Errors for lines that name a known command but are malformed, or name
/// no command at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid cell index: '{0}'")]
    InvalidIndex(String),
    #[error("unknown move type: '{0}' (expected claim or defend)")]
    InvalidMoveType(String),
}

/// Parses a single line of input.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Ok(None);
    };

    let cmd = match head {
        "create" => Command::Create,
        "count" => Command::Count,
        "quit" => Command::Quit,
        "join" => Command::Join {
            code: single_arg(&tokens, "join <code>")?,
        },
        "sync" => Command::Sync {
            code: single_arg(&tokens, "sync <code>")?,
        },
        "move" => parse_move(&tokens)?,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

fn single_arg(tokens: &[&str], usage: &'static str) -> Result<String, ParseError> {
    match tokens {
        [_, arg] => Ok(arg.to_string()),
        _ => Err(ParseError::Usage(usage)),
    }
}

/// Parses `move <code> <player> <index> <claim|defend>`.
fn parse_move(tokens: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "move <code> <player> <index> <claim|defend>";
    let [_, code, player_id, index, kind] = tokens else {
        return Err(ParseError::Usage(USAGE));
    };
    let index = index
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidIndex(index.to_string()))?;
    let kind = MoveType::parse(kind).ok_or_else(|| ParseError::InvalidMoveType(kind.to_string()))?;
    Ok(Command::Move {
        code: code.to_string(),
        player_id: player_id.to_string(),
        index,
        kind,
    })
}
