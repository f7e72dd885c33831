//! The capability shared by every platform key reader.

use super::error::KeyReaderError;

/// Polls the keyboard one character at a time without blocking.
///
/// Implementations put the terminal into a mode where keystrokes arrive
/// immediately (no waiting for Enter) in [`open`](KeyReader::open), and put it
/// back in [`close`](KeyReader::close). Prefer [`KeyReaderSession`] over calling
/// these by hand so the terminal is restored on every exit path.
///
/// [`KeyReaderSession`]: super::KeyReaderSession
pub trait KeyReader {
    /// Save the current terminal mode and switch to cbreak mode.
    ///
    /// Calling `open` twice without `close` in between replaces the saved
    /// mode with the cbreak one, so the original cannot be restored.
    fn open(&mut self) -> Result<(), KeyReaderError>;

    /// Restore the mode saved by [`open`](KeyReader::open).
    ///
    /// A no-op when nothing was saved.
    fn close(&mut self) -> Result<(), KeyReaderError>;

    /// Return one pending character, or `None` if there is no input.
    ///
    /// Never waits for a keypress. Buffered input is returned one character
    /// per call, in the order it was typed.
    fn read(&mut self) -> Result<Option<char>, KeyReaderError>;
}

impl<R: KeyReader + ?Sized> KeyReader for &mut R {
    fn open(&mut self) -> Result<(), KeyReaderError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), KeyReaderError> {
        (**self).close()
    }

    fn read(&mut self) -> Result<Option<char>, KeyReaderError> {
        (**self).read()
    }
}
