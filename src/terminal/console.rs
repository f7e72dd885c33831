//! Windows console key reader built on the CRT's `_kbhit` / `_getwch`.
//!
//! The console already delivers keystrokes without waiting for Enter when
//! read this way, so `open` and `close` change nothing.

use std::os::raw::c_int;

use super::error::KeyReaderError;
use super::reader::KeyReader;

extern "C" {
    fn _kbhit() -> c_int;
    fn _getwch() -> u16;
}

pub struct ConsoleKeyReader {
    verbose: bool,
}

impl ConsoleKeyReader {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn fetch_unit(&self) -> u16 {
        // SAFETY: only called after _kbhit reported a pending key.
        unsafe { _getwch() }
    }
}

impl KeyReader for ConsoleKeyReader {
    fn open(&mut self) -> Result<(), KeyReaderError> {
        if self.verbose {
            println!("KeyReader: Opening...");
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), KeyReaderError> {
        if self.verbose {
            println!("KeyReader: Closing...");
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<char>, KeyReaderError> {
        // SAFETY: _kbhit has no preconditions.
        if unsafe { _kbhit() } == 0 {
            return Ok(None);
        }

        let first = self.fetch_unit();
        let mut units = vec![first];
        // Characters outside the BMP arrive as a surrogate pair
        if (0xD800..=0xDBFF).contains(&first) {
            units.push(self.fetch_unit());
        }

        match char::decode_utf16(units.iter().copied()).next() {
            Some(Ok(c)) => Ok(Some(c)),
            _ => Err(KeyReaderError::Decode {
                bytes: units.iter().flat_map(|u| u.to_le_bytes()).collect(),
            }),
        }
    }
}
