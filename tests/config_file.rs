//! Loading the demo config from disk.

use std::io::Write;
use std::time::Duration;

use key_reader::config::{Config, ConfigError};

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_full_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[keys]
verbose = false
poll_interval_ms = 20

[lines]
prompt = "Press Enter: "
minimum_interval_secs = 1.5
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert!(!config.keys.verbose);
    assert_eq!(config.keys.poll_interval(), Duration::from_millis(20));
    assert_eq!(config.lines.prompt, "Press Enter: ");
    assert_eq!(
        config.lines.minimum_interval().unwrap(),
        Duration::from_millis(1500)
    );
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[keys]\npoll_interval_ms = \"soon\"").unwrap();

    match Config::load(Some(file.path())) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_negative_interval_loads_but_does_not_validate() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[lines]\nminimum_interval_secs = -2.0").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert!(matches!(
        config.lines.minimum_interval(),
        Err(ConfigError::InvalidInterval(secs)) if secs == -2.0
    ));
}

#[test]
fn test_rendered_config_loads_back() {
    let mut config = Config::default();
    config.lines.prompt = "> ".to_string();
    config.keys.poll_interval_ms = 10;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();

    assert_eq!(Config::load(Some(file.path())).unwrap(), config);
}
