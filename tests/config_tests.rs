// Configuration loading tests

use std::io::Write;
use std::time::Duration;

use powgrind::{config, miner::SearchConfig};

#[test]
fn full_config_parses() {
    let cfg = config::load_from_str(
        r#"
[search]
prefix = "hello"
difficulty_bits = 18
workers = 8
report_interval_secs = 5
max_attempts = 1000000
timeout_secs = 60
"#,
    )
    .unwrap();
    assert_eq!(cfg.search.prefix, "hello");
    assert_eq!(cfg.search.difficulty_bits, 18);
    assert_eq!(cfg.search.workers, 8);
    assert_eq!(cfg.search.report_interval_secs, 5);
    assert_eq!(cfg.search.max_attempts, 1_000_000);
    assert_eq!(cfg.search.timeout_secs, Some(60));
}

#[test]
fn defaults_fill_missing_fields() {
    let cfg = config::load_from_str("[search]\n").unwrap();
    assert_eq!(cfg.search.prefix, "");
    assert_eq!(cfg.search.difficulty_bits, 22);
    assert_eq!(cfg.search.workers, 0);
    assert_eq!(cfg.search.report_interval_secs, 2);
    assert_eq!(cfg.search.max_attempts, 0);
    assert_eq!(cfg.search.timeout_secs, None);
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nprefix = \"file test\"\ndifficulty_bits = 9").unwrap();
    let cfg = config::load(file.path()).unwrap();
    assert_eq!(cfg.search.prefix, "file test");
    assert_eq!(cfg.search.difficulty_bits, 9);
}

#[test]
fn missing_file_reports_its_path() {
    let err = config::load("definitely-not-here.toml").unwrap_err();
    assert!(format!("{err:#}").contains("definitely-not-here.toml"));
}

#[test]
fn invalid_toml_is_rejected() {
    assert!(config::load_from_str("[search").is_err());
}

#[test]
fn embedded_default_config_parses() {
    let cfg = config::load_from_str(include_str!("../config.toml")).unwrap();
    assert_eq!(cfg.search.workers, 0);
    assert!(cfg.search.difficulty_bits > 0);
}

#[test]
fn search_settings_map_to_runtime_config() {
    let cfg = config::load_from_str(
        r#"
[search]
prefix = "abc"
difficulty_bits = 12
report_interval_secs = 3
timeout_secs = 7
"#,
    )
    .unwrap();
    let runtime = SearchConfig::from(&cfg.search);
    assert_eq!(runtime.prefix, b"abc".to_vec());
    assert_eq!(runtime.difficulty_bits, 12);
    assert_eq!(runtime.report_interval, Duration::from_secs(3));
    assert_eq!(runtime.timeout, Some(Duration::from_secs(7)));
    assert_eq!(runtime.max_attempts, 0);
    assert!(runtime.progress.is_none());
}
