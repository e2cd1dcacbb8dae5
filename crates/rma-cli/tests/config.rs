use std::fs;
use std::path::Path;

use rma_cli::config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
use rma_model::{Role, SemanticField};
use tempfile::TempDir;

const SAMPLE: &str = r#"
role = "mod"
default_top_n = 7

[columns]
customer = ["client"]
serial = ["s/n"]
"#;

#[test]
fn sample_config_parses() {
    let config = Config::parse(SAMPLE, Path::new("rma.toml")).expect("parse");
    assert_eq!(config.role, Some(Role::Mod));
    assert_eq!(config.default_top_n, Some(7));
    assert_eq!(
        config.columns.get(&SemanticField::Serial),
        Some(&vec!["s/n".to_string()])
    );
}

#[test]
fn extra_candidates_reach_the_resolver() {
    let config = Config::parse(SAMPLE, Path::new("rma.toml")).expect("parse");
    let resolver = config.resolver();
    let headers = ["Client Name", "S/N", "Model"];
    assert_eq!(
        resolver.resolve(&headers, SemanticField::Customer),
        Some("Client Name".to_string())
    );
    assert_eq!(
        resolver.resolve(&headers, SemanticField::Serial),
        Some("S/N".to_string())
    );
}

#[test]
fn unknown_column_field_is_rejected() {
    let err = Config::parse("[columns]\ncolour = [\"red\"]", Path::new("x.toml"))
        .expect_err("unknown field");
    match err {
        ConfigError::UnknownField { field, .. } => assert_eq!(field, "colour"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn discover_reads_default_file() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "role = \"admin\"").expect("write");
    let config = Config::discover(None, dir.path()).expect("discover");
    assert_eq!(config.role, Some(Role::Admin));
}

#[test]
fn discover_without_file_is_default() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::discover(None, dir.path()).expect("discover");
    assert_eq!(config, Config::default());
}

#[test]
fn broken_discovered_file_falls_back_to_default() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "role = ").expect("write");
    let config = Config::discover(None, dir.path()).expect("discover");
    assert_eq!(config, Config::default());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("missing.toml");
    let err = Config::discover(Some(&path), dir.path()).expect_err("missing");
    assert!(matches!(err, ConfigError::Read { .. }));
}
