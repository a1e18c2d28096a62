//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction, PlayArgs};
pub use commands::{
    handle_config_action, resolve_target, run_evaluate, run_play, run_word, session_settings,
    CommandError,
};
