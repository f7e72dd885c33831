//! POSIX key reader: termios cbreak mode plus a zero-timeout `poll`.

use std::fmt;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

use super::error::KeyReaderError;
use super::reader::KeyReader;

/// Snapshot of a terminal's termios attributes.
#[derive(Clone, Copy)]
pub struct TerminalMode {
    attrs: libc::termios,
}

impl TerminalMode {
    /// Read the current attributes of `fd`.
    ///
    /// # Errors
    /// Fails with `ENOTTY` when `fd` is not a terminal.
    pub fn capture(fd: RawFd) -> io::Result<Self> {
        let mut attrs = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initializes `attrs` when it returns 0.
        let rc = unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            attrs: unsafe { attrs.assume_init() },
        })
    }

    /// Apply these attributes to `fd`. `when` is one of `TCSANOW`,
    /// `TCSADRAIN` or `TCSAFLUSH`.
    pub fn apply(&self, fd: RawFd, when: libc::c_int) -> io::Result<()> {
        // SAFETY: `attrs` is a valid termios value owned by self.
        let rc = unsafe { libc::tcsetattr(fd, when, &self.attrs) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// These attributes with line buffering and echo turned off, so each
    /// keystroke is readable as soon as it is typed. Signals and output
    /// processing are left alone.
    pub fn cbreak(&self) -> Self {
        let mut attrs = self.attrs;
        attrs.c_lflag &= !(libc::ECHO | libc::ICANON);
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;
        Self { attrs }
    }

    pub fn is_canonical(&self) -> bool {
        self.attrs.c_lflag & libc::ICANON != 0
    }

    pub fn echoes(&self) -> bool {
        self.attrs.c_lflag & libc::ECHO != 0
    }

    /// Input and output baud rates.
    pub fn speeds(&self) -> (libc::speed_t, libc::speed_t) {
        // SAFETY: both only read from a valid termios value.
        unsafe {
            (
                libc::cfgetispeed(&self.attrs),
                libc::cfgetospeed(&self.attrs),
            )
        }
    }
}

impl PartialEq for TerminalMode {
    fn eq(&self, other: &Self) -> bool {
        self.attrs.c_iflag == other.attrs.c_iflag
            && self.attrs.c_oflag == other.attrs.c_oflag
            && self.attrs.c_cflag == other.attrs.c_cflag
            && self.attrs.c_lflag == other.attrs.c_lflag
            && self.attrs.c_cc == other.attrs.c_cc
            && self.speeds() == other.speeds()
    }
}

impl Eq for TerminalMode {}

impl fmt::Debug for TerminalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalMode")
            .field("c_iflag", &format_args!("{:#x}", self.attrs.c_iflag))
            .field("c_oflag", &format_args!("{:#x}", self.attrs.c_oflag))
            .field("c_cflag", &format_args!("{:#x}", self.attrs.c_cflag))
            .field("c_lflag", &format_args!("{:#x}", self.attrs.c_lflag))
            .field("c_cc", &self.attrs.c_cc)
            .field("speeds", &self.speeds())
            .finish()
    }
}

/// Key reader for unix terminals.
///
/// `open` saves the termios attributes of the file descriptor and enables
/// cbreak mode; `read` polls with a zero timeout and reads one UTF-8
/// character when input is ready; `close` restores the saved attributes once
/// pending output has drained.
pub struct PosixKeyReader {
    fd: RawFd,
    verbose: bool,
    saved: Option<TerminalMode>,
    /// Byte that ended a broken UTF-8 sequence; the next `read` starts with it
    carried: Option<u8>,
}

impl PosixKeyReader {
    /// Reader bound to standard input.
    pub fn new(verbose: bool) -> Self {
        Self::with_fd(libc::STDIN_FILENO, verbose)
    }

    /// Reader bound to an arbitrary terminal file descriptor.
    /// The descriptor is borrowed: it must stay open for the reader's lifetime
    /// and is not closed on drop.
    pub fn with_fd(fd: RawFd, verbose: bool) -> Self {
        Self {
            fd,
            verbose,
            saved: None,
            carried: None,
        }
    }

    /// Mode that `close` will restore, if `open` has run.
    pub fn saved_mode(&self) -> Option<&TerminalMode> {
        self.saved.as_ref()
    }

    fn input_pending(&self) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            // SAFETY: one valid pollfd, zero timeout.
            let rc = unsafe { libc::poll(&mut pfd, 1, 0) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if pfd.revents & libc::POLLNVAL != 0 {
                return Err(io::Error::from_raw_os_error(libc::EBADF));
            }
            return Ok(rc > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0);
        }
    }

    /// Read a single byte. `None` means end of input.
    fn read_byte(&self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // SAFETY: reading at most one byte into a one-byte buffer.
            let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast(), 1) };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            return Ok((n == 1).then_some(byte));
        }
    }
}

impl KeyReader for PosixKeyReader {
    fn open(&mut self) -> Result<(), KeyReaderError> {
        if self.verbose {
            println!("KeyReader: Opening...");
        }
        let original = TerminalMode::capture(self.fd)?;
        original.cbreak().apply(self.fd, libc::TCSAFLUSH)?;
        log::debug!("Enabled cbreak mode on fd {}", self.fd);
        self.saved = Some(original);
        Ok(())
    }

    fn close(&mut self) -> Result<(), KeyReaderError> {
        if self.verbose {
            println!("KeyReader: Closing...");
        }
        if let Some(mode) = self.saved.take() {
            mode.apply(self.fd, libc::TCSADRAIN)?;
            log::debug!("Restored terminal mode on fd {}", self.fd);
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<char>, KeyReaderError> {
        let lead = match self.carried.take() {
            Some(byte) => byte,
            None => {
                if !self.input_pending()? {
                    return Ok(None);
                }
                match self.read_byte()? {
                    Some(byte) => byte,
                    None => return Ok(None),
                }
            }
        };

        let mut bytes = vec![lead];
        let width = utf8_width(lead);
        while bytes.len() < width {
            // Only take bytes that are already buffered so a lone lead byte
            // cannot stall the caller until the next keystroke
            if !self.input_pending()? {
                break;
            }
            match self.read_byte()? {
                Some(byte) if is_continuation(byte) => bytes.push(byte),
                Some(byte) => {
                    self.carried = Some(byte);
                    break;
                }
                None => break,
            }
        }
        decode_char(bytes).map(Some)
    }
}

impl Drop for PosixKeyReader {
    fn drop(&mut self) {
        if let Some(mode) = self.saved.take() {
            let _ = mode.apply(self.fd, libc::TCSADRAIN);
        }
    }
}

/// Length of the UTF-8 sequence started by `lead`, or 1 for a byte that
/// cannot start one (decoding then reports it).
fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn decode_char(bytes: Vec<u8>) -> Result<char, KeyReaderError> {
    let decoded = std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next());
    decoded.ok_or(KeyReaderError::Decode { bytes })
}
