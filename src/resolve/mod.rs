//! Tick resolution.
//!
//! Applies both sides' pending moves simultaneously, runs combat, and checks
//! for a winner.

pub mod outcome;
pub mod tick;

pub use outcome::winner;
pub use tick::{
    apply_moves, resolve_tick, MoveOutcome, ResolveError, ResolvedMove, TickReport,
    CLAIM_NEUTRALIZE_PROBABILITY,
};
