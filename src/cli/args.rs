//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Demos for the non-blocking key reader and the debounced line prompt
#[derive(Parser, Debug)]
#[command(name = "key-reader")]
#[command(version, about = "Non-blocking keypress reader and debounced line input", long_about = None)]
pub struct Args {
    /// Demo to run (default: keys)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print each key as it is pressed, without waiting for Enter (Ctrl+C to quit)
    Keys {
        /// Print open/close notices
        #[arg(long, short)]
        verbose: bool,

        /// Suppress open/close notices
        #[arg(long, short, conflicts_with = "verbose")]
        quiet: bool,

        /// Milliseconds to sleep when no key is pending
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Read lines, ignoring empty lines caused by a held Enter key
    Lines {
        /// Prompt printed before each line
        #[arg(long, short)]
        prompt: Option<String>,

        /// Seconds an empty line must trail the previous one to count
        #[arg(long, short = 'i')]
        minimum_interval: Option<f64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["key-reader"]);
        assert!(args.command.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_keys_flags() {
        let args = Args::parse_from(["key-reader", "keys", "--verbose", "--poll-interval-ms", "10"]);
        assert_eq!(
            args.command,
            Some(Command::Keys {
                verbose: true,
                quiet: false,
                poll_interval_ms: Some(10),
            })
        );
    }

    #[test]
    fn test_args_keys_verbose_conflicts_with_quiet() {
        let result = Args::try_parse_from(["key-reader", "keys", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_lines_flags() {
        let args = Args::parse_from(["key-reader", "lines", "-p", "> ", "-i", "0.5"]);
        assert_eq!(
            args.command,
            Some(Command::Lines {
                prompt: Some("> ".to_string()),
                minimum_interval: Some(0.5),
            })
        );
    }

    #[test]
    fn test_args_global_config_after_subcommand() {
        let args = Args::parse_from(["key-reader", "lines", "--config", "/tmp/kr.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/kr.toml")));
    }

    #[test]
    fn test_args_config_actions() {
        let args = Args::parse_from(["key-reader", "config", "show"]);
        assert_eq!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        );

        let args = Args::parse_from(["key-reader", "config", "path"]);
        assert_eq!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        );
    }
}
