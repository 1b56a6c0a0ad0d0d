//! Expose the anchorlinks binary's internals for use in integration tests.
//! This is not a stable API; use `anchorlinks-core` from other programs.
pub mod cli;
pub mod commands;
pub mod utils;
