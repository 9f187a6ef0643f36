//! Library surface of the taxi warehouse loader CLI.
//!
//! The binary keeps argument parsing and console output to itself; the
//! pipeline and logging setup live here so integration tests can drive a
//! full run without spawning a process.

pub mod logging;
pub mod pipeline;
pub mod types;
