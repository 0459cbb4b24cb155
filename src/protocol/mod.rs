//! Console protocol handling.
//!
//! Line-oriented commands in, JSON responses out. Used by the `hexfront`
//! binary as a debugging and embedding surface over the registry.

pub mod parser;
pub mod response;

pub use parser::{parse_command, Command, ParseError};
pub use response::Response;
