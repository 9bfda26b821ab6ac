//! Library half of the `dbprefix` binary.
//!
//! Exposes the CLI definition and commands so they can be tested without
//! spawning the binary.

pub mod cli;
pub mod commands;
pub mod output;
