//! Subcommands of the `frais` binary.

pub mod config;
pub mod extract;
pub mod inspect;
