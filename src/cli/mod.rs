//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing and the demo subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction};
pub use commands::{
    describe_keys_error, handle_config_action, run_keys, run_keys_with, run_lines, run_lines_with,
    KeysSettings, LinesSettings,
};
