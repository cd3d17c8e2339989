//! clocksync CLI library.
//!
//! This crate provides the CLI interface for pushing WakaTime activity into
//! Clockify.

mod cli;
pub mod commands;
mod config;
pub mod exit;

pub use cli::Cli;
pub use config::{Config, DEFAULT_DAYS};
pub use exit::exit_code;
