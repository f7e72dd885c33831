//! Scoped key reader acquisition with drop-safe terminal restore.

use super::error::KeyReaderError;
use super::reader::KeyReader;

/// Guard that keeps a [`KeyReader`] open and closes it on drop.
/// This covers normal scope exit, early `?` returns, and panics that unwind.
pub struct KeyReaderSession<R: KeyReader> {
    reader: R,
    /// Whether this session still owes the reader a `close`
    active: bool,
}

impl<R: KeyReader> KeyReaderSession<R> {
    /// Open `reader` and return a session that will close it when dropped.
    ///
    /// # Errors
    /// Returns the reader's error if switching terminal modes fails. The
    /// reader is dropped in that case and the terminal is left untouched.
    pub fn open(mut reader: R) -> Result<Self, KeyReaderError> {
        reader.open()?;
        log::debug!("Key reader session opened");

        Ok(Self {
            reader,
            active: true,
        })
    }

    /// Poll for one pending character.
    pub fn read(&mut self) -> Result<Option<char>, KeyReaderError> {
        self.reader.read()
    }

    /// Close the reader now instead of at drop.
    /// After calling this, the session's drop is a no-op.
    pub fn close(&mut self) -> Result<(), KeyReaderError> {
        if self.active {
            self.active = false;
            self.reader.close()?;
            log::debug!("Key reader session closed");
        }
        Ok(())
    }

    /// Whether the terminal is still owned by this session.
    pub fn is_open(&self) -> bool {
        self.active
    }
}

impl<R: KeyReader> Drop for KeyReaderSession<R> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            // Best-effort restore, nowhere to propagate from drop
            if let Err(e) = self.reader.close() {
                log::warn!("Failed to restore terminal mode: {}", e);
            }
        }
    }
}
