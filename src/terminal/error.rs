//! Key reader error types

use std::io;

/// Errors raised while switching terminal modes or reading a key.
#[derive(Debug, thiserror::Error)]
pub enum KeyReaderError {
    /// Terminal access failed (e.g. standard input is not a terminal)
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The pending input was not a valid character
    #[error("input is not valid text: {bytes:02x?}")]
    Decode {
        /// Raw bytes consumed before decoding failed
        bytes: Vec<u8>,
    },
}

impl KeyReaderError {
    /// True when the failure came from a file descriptor that is not a terminal.
    pub fn is_not_a_terminal(&self) -> bool {
        match self {
            KeyReaderError::Io(e) => e.raw_os_error() == Some(not_a_terminal_code()),
            KeyReaderError::Decode { .. } => false,
        }
    }
}

#[cfg(unix)]
fn not_a_terminal_code() -> i32 {
    libc::ENOTTY
}

#[cfg(not(unix))]
fn not_a_terminal_code() -> i32 {
    // ERROR_INVALID_HANDLE
    6
}
