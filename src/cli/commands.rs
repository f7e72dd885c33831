//! Subcommand handlers for the keys/lines demos and config actions.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::args::ConfigAction;
use crate::config::{parse_interval, Config, ConfigError, KeysConfig, LinesConfig};
use crate::line_input::{Clock, DebouncedLineInput, InputError};
use crate::terminal::{platform_reader, KeyReader, KeyReaderError, KeyReaderSession};

/// Set by the Ctrl+C handler; the keys loop exits when it flips.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Effective settings for `keys` after applying CLI overrides to config.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysSettings {
    pub verbose: bool,
    pub poll_interval: Duration,
}

impl KeysSettings {
    pub fn resolve(
        config: &KeysConfig,
        verbose: bool,
        quiet: bool,
        poll_interval_ms: Option<u64>,
    ) -> Self {
        let verbose = if verbose {
            true
        } else if quiet {
            false
        } else {
            config.verbose
        };
        let poll_interval = poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.poll_interval());

        Self {
            verbose,
            poll_interval,
        }
    }
}

/// Effective settings for `lines` after applying CLI overrides to config.
#[derive(Debug, Clone, PartialEq)]
pub struct LinesSettings {
    pub prompt: String,
    pub minimum_interval: Duration,
}

impl LinesSettings {
    pub fn resolve(
        config: &LinesConfig,
        prompt: Option<String>,
        minimum_interval: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let minimum_interval = match minimum_interval {
            Some(secs) => parse_interval(secs)?,
            None => config.minimum_interval()?,
        };

        Ok(Self {
            prompt: prompt.unwrap_or_else(|| config.prompt.clone()),
            minimum_interval,
        })
    }
}

/// Run the keypress demo on the real terminal until Ctrl+C.
pub fn run_keys(settings: &KeysSettings) -> Result<(), Box<dyn Error>> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
    })?;

    let reader = platform_reader(settings.verbose);
    run_keys_with(reader, settings, &INTERRUPTED, &mut io::stdout())?;
    Ok(())
}

/// Message for a failed `keys` run, with a hint when stdin is not a terminal.
pub fn describe_keys_error(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<KeyReaderError>() {
        Some(e) if e.is_not_a_terminal() => format!(
            "{}\n\nThe keys demo needs an interactive terminal on standard input; \
             run it without piping or redirecting input.",
            e
        ),
        _ => err.to_string(),
    }
}

/// Poll `reader` and print every key until `stop` is set.
///
/// The reader is opened in a [`KeyReaderSession`], so the terminal mode is
/// restored when the loop ends, whether by `stop` or by an error.
pub fn run_keys_with<R: KeyReader, W: Write>(
    reader: R,
    settings: &KeysSettings,
    stop: &AtomicBool,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut session = KeyReaderSession::open(reader)?;

    while !stop.load(Ordering::SeqCst) {
        match session.read()? {
            Some(key) => {
                writeln!(out, "Key: {}", key)?;
                out.flush()?;
            }
            None => std::thread::sleep(settings.poll_interval),
        }
    }

    log::info!("Interrupted, restoring terminal");
    session.close()?;
    Ok(())
}

/// Run the line demo on stdin/stdout until end of input.
pub fn run_lines(settings: &LinesSettings) -> Result<(), InputError> {
    let mut input = DebouncedLineInput::stdio();
    run_lines_with(&mut input, settings, &mut io::stdout())
}

/// Echo accepted lines from `input` to `out` until end of input.
pub fn run_lines_with<R: BufRead, W: Write, C: Clock, O: Write>(
    input: &mut DebouncedLineInput<R, W, C>,
    settings: &LinesSettings,
    out: &mut O,
) -> Result<(), InputError> {
    loop {
        let text = match input.wait_for_enter(&settings.prompt, settings.minimum_interval) {
            Ok(text) => text,
            Err(InputError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        };

        if text.is_empty() {
            writeln!(out, "You didn't write anything!")?;
        } else {
            writeln!(out, "You wrote: {}", text)?;
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config: &Config, config_path: &Path) {
    match action {
        ConfigAction::Show => match config.to_toml() {
            Ok(rendered) => {
                if config_path.exists() {
                    println!("# Config file: {} (exists)", config_path.display());
                } else {
                    println!("# Config file: {} (not found, defaults)", config_path.display());
                }
                print!("{}", rendered);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Arc;

    /// Serves queued keys, then sets `stop` once drained.
    struct QueuedReader {
        pending: VecDeque<char>,
        stop: Arc<AtomicBool>,
        closed: Arc<AtomicBool>,
    }

    impl KeyReader for QueuedReader {
        fn open(&mut self) -> Result<(), KeyReaderError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), KeyReaderError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn read(&mut self) -> Result<Option<char>, KeyReaderError> {
            let next = self.pending.pop_front();
            if next.is_none() {
                self.stop.store(true, Ordering::SeqCst);
            }
            Ok(next)
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_keys_error_hints_at_missing_terminal() {
        let err: Box<dyn Error> =
            Box::new(KeyReaderError::from(io::Error::from_raw_os_error(libc::ENOTTY)));
        let message = describe_keys_error(err.as_ref());
        assert!(message.contains("needs an interactive terminal"));
    }

    #[test]
    fn test_describe_keys_error_passes_other_errors_through() {
        let err: Box<dyn Error> = Box::new(KeyReaderError::Decode { bytes: vec![0xFF] });
        assert_eq!(describe_keys_error(err.as_ref()), "input is not valid text: [ff]");

        let err: Box<dyn Error> = "handler already set".into();
        assert_eq!(describe_keys_error(err.as_ref()), "handler already set");
    }

    #[test]
    fn test_keys_settings_cli_overrides_config() {
        let config = KeysConfig {
            verbose: true,
            poll_interval_ms: 50,
        };
        let settings = KeysSettings::resolve(&config, false, true, Some(5));
        assert!(!settings.verbose);
        assert_eq!(settings.poll_interval, Duration::from_millis(5));

        let settings = KeysSettings::resolve(&config, false, false, None);
        assert!(settings.verbose);
        assert_eq!(settings.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_lines_settings_rejects_negative_interval() {
        let result = LinesSettings::resolve(&LinesConfig::default(), None, Some(-1.0));
        assert!(matches!(result, Err(ConfigError::InvalidInterval(_))));
    }

    #[test]
    fn test_lines_settings_uses_config_prompt() {
        let config = LinesConfig {
            prompt: "? ".to_string(),
            minimum_interval_secs: 0.25,
        };
        let settings = LinesSettings::resolve(&config, None, None).unwrap();
        assert_eq!(settings.prompt, "? ");
        assert_eq!(settings.minimum_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_run_keys_prints_each_key_and_closes() {
        let stop = Arc::new(AtomicBool::new(false));
        let closed = Arc::new(AtomicBool::new(false));
        let reader = QueuedReader {
            pending: "hi".chars().collect(),
            stop: stop.clone(),
            closed: closed.clone(),
        };
        let settings = KeysSettings {
            verbose: false,
            poll_interval: Duration::from_millis(1),
        };

        let mut out = Vec::new();
        run_keys_with(reader, &settings, &stop, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Key: h\nKey: i\n");
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_lines_echoes_until_eof() {
        let mut input = DebouncedLineInput::new(Cursor::new("hello\n\n"), Vec::<u8>::new());
        let settings = LinesSettings {
            prompt: String::new(),
            minimum_interval: Duration::ZERO,
        };

        let mut out = Vec::new();
        run_lines_with(&mut input, &settings, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "You wrote: hello\nYou didn't write anything!\n"
        );
    }
}
