//! Live match registry.
//!
//! Owns every live match. The code → match map sits behind a reader/writer
//! lock and each match behind its own mutex, so request handlers and the
//! tick scheduler only contend when they touch the same match. Matches are
//! looked up by code on every operation; once evicted, a match is
//! unreachable and any handle still held elsewhere sees it as gone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::board::{Board, Move, MoveType, Side, Topology};
use crate::config::EngineConfig;
use crate::event::MatchEvent;
use crate::game::{duration_millis, now_millis, Match, MatchView, Millis};
use crate::movegen::MoveError;

/// Number of letters in a match code.
pub const CODE_LEN: usize = 4;

/// Errors surfaced by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no match with code {0}")]
    NotFound(String),
    #[error("match {0} is in a faulted state")]
    Faulted(String),
    #[error("no unused match code found after {0} attempts")]
    CodeSpaceExhausted(u32),
    #[error("board has fewer than two playable cells")]
    BoardTooSmall,
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedMatch {
    pub code: String,
    pub host_id: String,
    pub challenger_id: String,
    pub board: Vec<Option<i8>>,
    pub next_tick_time: Millis,
}

/// Response to a successful join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedMatch {
    pub code: String,
    pub challenger_id: String,
    pub board: Vec<Option<i8>>,
    pub next_tick_time: Millis,
}

/// Response to an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptedMove {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
    pub next_tick_time: Millis,
}

/// Why a match was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    /// Nobody joined within the join timeout.
    JoinTimeout,
    /// Too many consecutive ticks without a move.
    Inactive,
    /// The finished-match grace period elapsed.
    Finished,
    /// The match lock was poisoned by a panic.
    Faulted,
}

/// What one scheduler wake did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WakeReport {
    pub resolved: usize,
    pub failed: usize,
    pub evicted: Vec<(String, EvictionReason)>,
}

type MatchHandle = Arc<Mutex<Match>>;

enum TickOutcome {
    Resolved,
    Failed,
}

/// The set of live matches.
pub struct MatchRegistry {
    config: EngineConfig,
    topology: Arc<Topology>,
    matches: RwLock<HashMap<String, MatchHandle>>,
    rng: Mutex<SmallRng>,
    player_serial: AtomicU64,
    events: Sender<MatchEvent>,
}

impl MatchRegistry {
    /// Creates an empty registry on the standard board.
    ///
    /// Returns the receiving end of the event channel alongside it.
    pub fn new(config: EngineConfig) -> (Self, Receiver<MatchEvent>) {
        let (tx, rx) = mpsc::channel();
        let rng = if config.seed != 0 {
            SmallRng::seed_from_u64(config.seed)
        } else {
            SmallRng::from_entropy()
        };
        let registry = MatchRegistry {
            config,
            topology: Topology::standard(),
            matches: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
            player_serial: AtomicU64::new(0),
            events: tx,
        };
        (registry, rx)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a match at the current time.
    pub fn create(&self) -> Result<CreatedMatch, RegistryError> {
        self.create_at(now_millis())
    }

    /// Creates a match with creation time `now`.
    pub fn create_at(&self, now: Millis) -> Result<CreatedMatch, RegistryError> {
        let mut matches = self.write_matches();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let attempts = self.config.code_attempts;
        let code = (0..attempts)
            .map(|_| random_code(&mut *rng))
            .find(|c| !matches.contains_key(c))
            .ok_or(RegistryError::CodeSpaceExhausted(attempts))?;

        let host_id = self.player_id(&mut *rng);
        let challenger_id = self.player_id(&mut *rng);

        let mut board = Board::empty(Arc::clone(&self.topology));
        let (host_cell, challenger_cell) = board
            .place_fortresses(&mut *rng)
            .ok_or(RegistryError::BoardTooSmall)?;

        let game = Match::new(
            code.clone(),
            host_id,
            challenger_id,
            board,
            now,
            duration_millis(self.config.tick_interval),
            SmallRng::seed_from_u64(rng.gen()),
        );
        let created = CreatedMatch {
            code: code.clone(),
            host_id: game.host_id.clone(),
            challenger_id: game.challenger_id.clone(),
            board: game.board.snapshot(),
            next_tick_time: game.next_tick_at,
        };
        matches.insert(code, Arc::new(Mutex::new(game)));

        info!(
            code = %created.code,
            host_cell,
            challenger_cell,
            active = matches.len(),
            "match created"
        );
        Ok(created)
    }

    /// Joins a match as the challenger at the current time.
    pub fn join(&self, code: &str) -> Result<JoinedMatch, RegistryError> {
        self.join_at(code, now_millis())
    }

    /// Joins a match at `now`. Joining an already started match is a no-op.
    pub fn join_at(&self, code: &str, now: Millis) -> Result<JoinedMatch, RegistryError> {
        self.with_match(code, |game| {
            if game.start(now) {
                info!(code, "challenger joined; match started");
            } else {
                debug!(code, "repeat join ignored");
            }
            JoinedMatch {
                code: game.code.clone(),
                challenger_id: game.challenger_id.clone(),
                board: game.board.snapshot(),
                next_tick_time: game.next_tick_at,
            }
        })
    }

    /// Validates a move and records it as the player's pending intent.
    pub fn submit_move(
        &self,
        code: &str,
        player_id: &str,
        index: usize,
        kind: MoveType,
    ) -> Result<AcceptedMove, RegistryError> {
        // Previews and state updates are both sent under the match lock, so
        // observers see them in the order the match saw them.
        let result = self.with_match(code, |game| {
            let (side, mv) = game.submit(player_id, index, kind)?;
            self.publish(MatchEvent::MovePreview {
                code: code.to_string(),
                side,
                mv,
            });
            Ok::<_, MoveError>(AcceptedMove {
                side,
                mv,
                next_tick_time: game.next_tick_at,
            })
        })?;

        match result {
            Ok(accepted) => {
                debug!(code, side = %accepted.side, index, kind = kind.as_str(), "move accepted");
                Ok(accepted)
            }
            Err(err) => {
                debug!(code, index, kind = kind.as_str(), reason = err.reason(), "move rejected");
                Err(RegistryError::Move(err))
            }
        }
    }

    /// Returns the current state of a match.
    pub fn sync(&self, code: &str) -> Result<MatchView, RegistryError> {
        self.with_match(code, |game| game.view())
    }

    /// Number of live matches.
    pub fn count_active(&self) -> usize {
        self.read_matches().len()
    }

    /// Looks up a match and runs `f` with its lock held.
    pub fn with_match<R>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Match) -> R,
    ) -> Result<R, RegistryError> {
        let handle = self
            .read_matches()
            .get(code)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;
        let mut game = lock_match(&handle).ok_or_else(|| RegistryError::Faulted(code.to_string()))?;
        if game.evicted {
            return Err(RegistryError::NotFound(code.to_string()));
        }
        Ok(f(&mut game))
    }

    /// Resolves every due match, then evicts expired ones.
    ///
    /// Matches are resolved in parallel; a failure in one is logged and
    /// does not affect the others.
    pub fn run_due(&self, now: Millis) -> WakeReport {
        let handles: Vec<(String, MatchHandle)> = self
            .read_matches()
            .iter()
            .map(|(code, handle)| (code.clone(), Arc::clone(handle)))
            .collect();

        let outcomes: Vec<TickOutcome> = handles
            .par_iter()
            .filter_map(|(code, handle)| self.resolve_due(code, handle, now))
            .collect();

        let mut report = WakeReport::default();
        for outcome in outcomes {
            match outcome {
                TickOutcome::Resolved => report.resolved += 1,
                TickOutcome::Failed => report.failed += 1,
            }
        }
        report.evicted = self.evict(now);
        report
    }

    /// Removes matches that timed out, went idle, or finished long enough ago.
    pub fn evict(&self, now: Millis) -> Vec<(String, EvictionReason)> {
        let mut evicted = Vec::new();
        {
            let mut matches = self.write_matches();
            matches.retain(|code, handle| {
                let reason = match handle.lock() {
                    Ok(mut game) => {
                        let reason = self.eviction_reason(&game, now);
                        if reason.is_some() {
                            game.evicted = true;
                        }
                        reason
                    }
                    Err(_) => Some(EvictionReason::Faulted),
                };
                match reason {
                    Some(reason) => {
                        evicted.push((code.clone(), reason));
                        false
                    }
                    None => true,
                }
            });
        }

        for (code, reason) in &evicted {
            match reason {
                EvictionReason::Faulted => error!(code = %code, "faulted match evicted"),
                _ => info!(code = %code, reason = ?reason, "match evicted"),
            }
            if *reason == EvictionReason::Inactive {
                self.publish(MatchEvent::MatchTimeout { code: code.clone() });
            }
        }
        evicted
    }

    fn eviction_reason(&self, game: &Match, now: Millis) -> Option<EvictionReason> {
        if !game.is_started() {
            let waited = now.saturating_sub(game.created_at);
            return (waited > duration_millis(self.config.join_timeout))
                .then_some(EvictionReason::JoinTimeout);
        }
        if let Some(finished_at) = game.finished_at {
            let since = now.saturating_sub(finished_at);
            return (since >= duration_millis(self.config.finished_grace))
                .then_some(EvictionReason::Finished);
        }
        (game.idle_ticks > self.config.idle_tick_limit).then_some(EvictionReason::Inactive)
    }

    /// Resolves one match if its tick is due.
    ///
    /// The state update is published before the match lock is released, so
    /// it can never trail a preview of a move submitted after the tick.
    fn resolve_due(&self, code: &str, handle: &MatchHandle, now: Millis) -> Option<TickOutcome> {
        let Some(mut game) = lock_match(handle) else {
            error!(code, "match state poisoned; skipping tick");
            return Some(TickOutcome::Failed);
        };
        if game.evicted || !game.is_due(now) {
            return None;
        }

        match game.tick(now) {
            Ok(report) => {
                debug!(
                    code,
                    idle = report.idle,
                    moves = report.resolved.len(),
                    idle_ticks = game.idle_ticks,
                    "tick resolved"
                );
                if let Some(winner) = report.winner {
                    info!(code, winner = %winner, "match finished");
                }
                self.publish(MatchEvent::StateUpdate {
                    code: code.to_string(),
                    state: game.view(),
                    resolved: report.resolved,
                });
                Some(TickOutcome::Resolved)
            }
            Err(err) => {
                error!(code, error = %err, "tick resolution failed; skipping match");
                Some(TickOutcome::Failed)
            }
        }
    }

    /// Generates an opaque player identifier that is never handed out twice.
    fn player_id(&self, rng: &mut SmallRng) -> String {
        let serial = self.player_serial.fetch_add(1, Ordering::Relaxed);
        format!("{:08x}{:06x}", rng.gen::<u32>(), serial)
    }

    fn publish(&self, event: MatchEvent) {
        if self.events.send(event).is_err() {
            debug!("event dropped; no listener");
        }
    }

    fn read_matches(&self) -> RwLockReadGuard<'_, HashMap<String, MatchHandle>> {
        self.matches.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_matches(&self) -> RwLockWriteGuard<'_, HashMap<String, MatchHandle>> {
        self.matches.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Locks a match, returning `None` if a panic poisoned it.
fn lock_match(handle: &MatchHandle) -> Option<MutexGuard<'_, Match>> {
    handle.lock().ok()
}

fn random_code(rng: &mut impl Rng) -> String {
    (0..CODE_LEN)
        .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
        .collect()
}
