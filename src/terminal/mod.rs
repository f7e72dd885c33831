//! Non-blocking keypress reading - cbreak mode, single-character polling, and cleanup.
//!
//! # Structure
//!
//! - [`KeyReader`] - the open/close/read capability every platform implements
//! - [`KeyReaderSession`] - scoped acquisition that restores the terminal on drop
//! - `PosixKeyReader` - termios + `poll` (unix)
//! - `ConsoleKeyReader` - `_kbhit` + `_getwch` (windows)

mod error;
mod reader;
mod session;

#[cfg(windows)]
mod console;
#[cfg(unix)]
mod posix;

pub use error::KeyReaderError;
pub use reader::KeyReader;
pub use session::KeyReaderSession;

#[cfg(windows)]
pub use console::ConsoleKeyReader;
#[cfg(unix)]
pub use posix::{PosixKeyReader, TerminalMode};

/// Key reader for the host platform, chosen at compile time.
#[cfg(unix)]
pub type PlatformKeyReader = PosixKeyReader;

/// Key reader for the host platform, chosen at compile time.
#[cfg(windows)]
pub type PlatformKeyReader = ConsoleKeyReader;

/// Create the host platform's key reader bound to standard input.
pub fn platform_reader(verbose: bool) -> PlatformKeyReader {
    PlatformKeyReader::new(verbose)
}
