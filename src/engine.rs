//! Console engine.
//!
//! Dispatches parsed console commands against a shared match registry and
//! writes one JSON response per command.

use std::io::{self, Write};
use std::sync::Arc;

use crate::event::MatchEvent;
use crate::protocol::{parse_command, Command, Response};
use crate::registry::MatchRegistry;

/// Whether the console loop should keep reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Holds the registry the console commands operate on.
pub struct Engine {
    registry: Arc<MatchRegistry>,
}

impl Engine {
    pub fn new(registry: Arc<MatchRegistry>) -> Self {
        Engine { registry }
    }

    pub fn registry(&self) -> &Arc<MatchRegistry> {
        &self.registry
    }

    /// Runs one command. Returns `None` for `quit`.
    pub fn respond(&self, cmd: Command) -> Option<Response> {
        let response = match cmd {
            Command::Create => self.registry.create().map(Response::Created),
            Command::Join { code } => self.registry.join(&code).map(Response::Joined),
            Command::Move {
                code,
                player_id,
                index,
                kind,
            } => self
                .registry
                .submit_move(&code, &player_id, index, kind)
                .map(Response::Accepted),
            Command::Sync { code } => self.registry.sync(&code).map(Response::Sync),
            Command::Count => Ok(Response::Count {
                active: self.registry.count_active(),
            }),
            Command::Quit => return None,
        };
        Some(response.unwrap_or_else(Response::from))
    }

    /// Parses and runs one input line, writing its response to `out`.
    pub fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Flow> {
        let response = match parse_command(line) {
            Ok(None) => return Ok(Flow::Continue),
            Ok(Some(cmd)) => match self.respond(cmd) {
                Some(response) => response,
                None => return Ok(Flow::Quit),
            },
            Err(err) => Response::error(err),
        };
        writeln!(out, "{}", response.to_json())?;
        out.flush()?;
        Ok(Flow::Continue)
    }
}

/// Writes one event as a JSON line.
pub fn write_event<W: Write>(event: &MatchEvent, out: &mut W) -> io::Result<()> {
    let json = serde_json::to_string(event).map_err(io::Error::other)?;
    writeln!(out, "{}", json)?;
    out.flush()
}
