//! key-reader library crate.
//!
//! - [`terminal`] polls the keyboard one character at a time without blocking,
//!   switching the terminal to cbreak mode for the lifetime of a
//!   [`KeyReaderSession`](terminal::KeyReaderSession).
//! - [`line_input`] reads whole lines but ignores the burst of empty lines a
//!   held Enter key produces.

pub mod cli;
pub mod config;
pub mod line_input;
pub mod terminal;
