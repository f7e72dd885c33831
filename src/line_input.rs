//! Line input that ignores Enter key-repeat.
//!
//! Holding Enter down submits a burst of empty lines. [`DebouncedLineInput`]
//! drops an empty line that follows the previous submission too closely and
//! prompts again. Non-empty lines are never dropped, so the same text can be
//! entered twice in quick succession.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::time::{Duration, Instant};

/// Gap below which a repeated empty line counts as key-repeat.
pub const DEFAULT_MINIMUM_INTERVAL: Duration = Duration::from_millis(800);

/// Source of "now" for the debounce window.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Errors that can occur while reading a line.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input error: {0}")]
    Io(#[from] io::Error),

    /// Input closed before a line was read
    #[error("end of input")]
    Eof,
}

/// Decide whether a line read at `now` is a real submission.
///
/// The first read ever (`previous` is `None`) and any non-empty line are
/// accepted. An empty line is accepted only when at least
/// `minimum_interval` has passed since the previous read attempt.
pub fn accepts(
    previous: Option<Instant>,
    now: Instant,
    text: &str,
    minimum_interval: Duration,
) -> bool {
    match previous {
        None => true,
        Some(_) if !text.is_empty() => true,
        Some(previous) => now.saturating_duration_since(previous) >= minimum_interval,
    }
}

/// Blocking line reader that filters key-repeat on Enter.
///
/// The time of the last read attempt is kept on the instance and updated on
/// every attempt, accepted or not: a burst of empty lines keeps pushing the
/// window forward until the user pauses for `minimum_interval`.
pub struct DebouncedLineInput<R, W, C = SystemClock> {
    input: R,
    output: W,
    clock: C,
    minimum_interval: Duration,
    last_input: Option<Instant>,
}

impl DebouncedLineInput<StdinLock<'static>, Stdout> {
    /// Reader over standard input that prompts on standard output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> DebouncedLineInput<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::with_clock(input, output, SystemClock)
    }
}

impl<R: BufRead, W: Write, C: Clock> DebouncedLineInput<R, W, C> {
    pub fn with_clock(input: R, output: W, clock: C) -> Self {
        Self {
            input,
            output,
            clock,
            minimum_interval: DEFAULT_MINIMUM_INTERVAL,
            last_input: None,
        }
    }

    /// Set the interval used by [`wait_for_enter_default`](Self::wait_for_enter_default).
    pub fn with_minimum_interval(mut self, minimum_interval: Duration) -> Self {
        self.minimum_interval = minimum_interval;
        self
    }

    pub fn minimum_interval(&self) -> Duration {
        self.minimum_interval
    }

    /// Time of the most recent read attempt, if any.
    pub fn last_input(&self) -> Option<Instant> {
        self.last_input
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// [`wait_for_enter`](Self::wait_for_enter) with the configured interval.
    pub fn wait_for_enter_default(&mut self, prompt: &str) -> Result<String, InputError> {
        self.wait_for_enter(prompt, self.minimum_interval)
    }

    /// Prompt and read lines until one is accepted, then return it without
    /// its line terminator. The returned text may be empty.
    ///
    /// # Errors
    /// [`InputError::Eof`] if input closes before a line arrives,
    /// [`InputError::Io`] if reading or writing the prompt fails.
    pub fn wait_for_enter(
        &mut self,
        prompt: &str,
        minimum_interval: Duration,
    ) -> Result<String, InputError> {
        loop {
            let text = self.read_line(prompt)?;
            let now = self.clock.now();
            let previous = self.last_input.replace(now);

            if accepts(previous, now, &text, minimum_interval) {
                return Ok(text);
            }
            log::debug!(
                "Ignoring repeated empty line ({:?} after previous input)",
                previous.map(|p| now.saturating_duration_since(p))
            );
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Eof);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}
