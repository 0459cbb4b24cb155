//! hexfront engine library.
//!
//! Exposes the board representation, move validation, tick resolution, the
//! match registry and scheduler, and the console protocol for use by
//! integration tests and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod event;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod registry;
pub mod resolve;
pub mod scheduler;
pub mod selfplay;
