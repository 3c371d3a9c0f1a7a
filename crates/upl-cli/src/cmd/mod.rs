//! Subcommand implementations.

pub mod available;
pub mod completions;
pub mod info;
pub mod install;
pub mod list;
pub mod remove;
pub mod search;
pub mod sources;
