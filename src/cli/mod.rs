//! CLI module for wiggum - argument parsing and resolution.
//!
//! Raw argv is parsed by clap and resolved into an immutable [`RunConfig`]
//! with tool-dependent defaults applied.

pub mod commands;

pub use commands::Cli;
