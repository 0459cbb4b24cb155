//! Match state.
//!
//! Holds one board, both player identifiers, the pending intents, and the
//! timers that drive resolution. A `Match` carries its own seeded random
//! source so combat outcomes are reproducible per match.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use serde::Serialize;

use crate::board::{Board, Move, MoveType, Side};
use crate::movegen::{validate, MoveError};
use crate::resolve::{resolve_tick, ResolveError, TickReport};

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> Millis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or(0)
}

/// Converts a duration to whole milliseconds, saturating.
pub fn duration_millis(d: Duration) -> Millis {
    d.as_millis().try_into().unwrap_or(Millis::MAX)
}

/// The unresolved intent of each side; at most one per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingMoves {
    pub host: Option<Move>,
    pub challenger: Option<Move>,
}

impl PendingMoves {
    pub fn get(&self, side: Side) -> Option<Move> {
        match side {
            Side::Host => self.host,
            Side::Challenger => self.challenger,
        }
    }

    /// Records `mv` for `side`, replacing any earlier intent.
    pub fn set(&mut self, side: Side, mv: Move) {
        match side {
            Side::Host => self.host = Some(mv),
            Side::Challenger => self.challenger = Some(mv),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.challenger.is_none()
    }
}

/// A single two-player match.
#[derive(Debug)]
pub struct Match {
    pub code: String,
    pub host_id: String,
    pub challenger_id: String,
    pub created_at: Millis,
    /// Set once, when the challenger joins.
    pub started_at: Option<Millis>,
    pub next_tick_at: Millis,
    pub tick_ms: Millis,
    pub idle_ticks: u32,
    pub board: Board,
    pub pending: PendingMoves,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub finished_at: Option<Millis>,
    /// Set by the registry when the match is removed.
    pub(crate) evicted: bool,
    pub(crate) rng: SmallRng,
}

/// Externally visible state of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchView {
    pub code: String,
    pub board: Vec<Option<i8>>,
    pub next_tick_time: Millis,
    pub pending_moves: PendingMoves,
    pub started: bool,
    pub game_over: bool,
    pub winner: Option<Side>,
}

impl Match {
    /// Creates an unstarted match. `now` is the creation time.
    pub fn new(
        code: String,
        host_id: String,
        challenger_id: String,
        board: Board,
        now: Millis,
        tick_ms: Millis,
        rng: SmallRng,
    ) -> Self {
        Match {
            code,
            host_id,
            challenger_id,
            created_at: now,
            started_at: None,
            next_tick_at: now.saturating_add(tick_ms),
            tick_ms,
            idle_ticks: 0,
            board,
            pending: PendingMoves::default(),
            game_over: false,
            winner: None,
            finished_at: None,
            evicted: false,
            rng,
        }
    }

    /// Maps a player identifier to its side.
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if player_id == self.host_id {
            Some(Side::Host)
        } else if player_id == self.challenger_id {
            Some(Side::Challenger)
        } else {
            None
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts the match and restarts the tick clock.
    ///
    /// Returns false without changing anything if it was already started.
    pub fn start(&mut self, now: Millis) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        self.next_tick_at = now.saturating_add(self.tick_ms);
        true
    }

    /// Validates a move and records it as the side's pending intent.
    pub fn submit(
        &mut self,
        player_id: &str,
        index: usize,
        kind: MoveType,
    ) -> Result<(Side, Move), MoveError> {
        let side = validate(self, player_id, index, kind)?;
        let mv = Move { index, kind };
        self.pending.set(side, mv);
        Ok((side, mv))
    }

    /// Returns true when a tick should be resolved at `now`.
    pub fn is_due(&self, now: Millis) -> bool {
        self.is_started() && !self.game_over && now >= self.next_tick_at
    }

    /// Resolves one tick at `now`.
    pub fn tick(&mut self, now: Millis) -> Result<TickReport, ResolveError> {
        resolve_tick(self, now)
    }

    pub fn view(&self) -> MatchView {
        MatchView {
            code: self.code.clone(),
            board: self.board.snapshot(),
            next_tick_time: self.next_tick_at,
            pending_moves: self.pending,
            started: self.is_started(),
            game_over: self.game_over,
            winner: self.winner,
        }
    }
}
