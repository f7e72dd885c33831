use clap::Parser;
use env_logger::Env;

use key_reader::cli::{
    describe_keys_error, handle_config_action, run_keys, run_lines, Args, Command, KeysSettings,
    LinesSettings,
};
use key_reader::config::{default_path, Config};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_path);

    // --config must point at an existing file; the default location may be absent
    if args.config.is_some() && !config_path.exists() {
        eprintln!("Error: config file not found: {}", config_path.display());
        std::process::exit(1);
    }

    let config = match Config::load(Some(config_path.as_path())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let command = args.command.unwrap_or(Command::Keys {
        verbose: false,
        quiet: false,
        poll_interval_ms: None,
    });

    match command {
        Command::Keys {
            verbose,
            quiet,
            poll_interval_ms,
        } => {
            let settings = KeysSettings::resolve(&config.keys, verbose, quiet, poll_interval_ms);
            if let Err(e) = run_keys(&settings) {
                eprintln!("Error: {}", describe_keys_error(e.as_ref()));
                std::process::exit(1);
            }
        }
        Command::Lines {
            prompt,
            minimum_interval,
        } => {
            let settings = match LinesSettings::resolve(&config.lines, prompt, minimum_interval) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = run_lines(&settings) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Config { action } => handle_config_action(action, &config, &config_path),
    }
}
