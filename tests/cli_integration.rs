//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

use session_tokens::cli::{parse_args_from, Args};
use session_tokens::config::Config;
use session_tokens::{BuildError, ExpiringStore, SalterPolicy};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("session-tokens")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert_eq!(result.count, 1);
    assert!(result.config.is_none());
    assert!(result.policy.is_none());
    assert!(result.salt.is_none());
    assert!(result.ttl_ms.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-P",
        "fast",
        "-s",
        "abc123",
        "-n",
        "500",
        "-t",
        "10",
        "-l",
        "debug",
    ]))
    .unwrap();

    assert_eq!(result.policy, Some(SalterPolicy::Fast));
    assert_eq!(result.salt, Some("abc123".to_string()));
    assert_eq!(result.count, 500);
    assert_eq!(result.ttl_ms, Some(10));
    assert_eq!(result.log_level, Some("debug".to_string()));
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/session-tokens.json"])).unwrap();

    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/session-tokens.json"
    );
}

#[test]
fn test_cli_invalid_values() {
    assert!(parse_args_from(args(&["-P", "paranoid"])).is_err());
    assert!(parse_args_from(args(&["-n", "zero"])).is_err());
    assert!(parse_args_from(args(&["-t", "soon"])).is_err());
    assert!(parse_args_from(args(&["--unknown"])).is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let file = config_file(
        r#"{
        "session": {
            "policy": "fast",
            "salt": "file-salt",
            "ttl_ms": 2500,
            "reset_on_access": true
        },
        "logging": {
            "level": "debug"
        }
    }"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.session.policy, SalterPolicy::Fast);
    assert_eq!(config.session.salt, "file-salt");
    assert_eq!(config.ttl(), Duration::from_millis(2500));
    assert!(config.session.reset_on_access);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let file = config_file(
        r#"{
        "session": {
            "policy": "secure",
            "salt": "file-salt",
            "ttl_ms": 5000
        }
    }"#,
    );

    let args = Args {
        config: Some(file.path().to_path_buf()),
        policy: Some(SalterPolicy::Fast),
        ttl_ms: Some(100),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.session.policy, SalterPolicy::Fast);
    assert_eq!(config.session.ttl_ms, 100);
    assert_eq!(config.session.salt, "file-salt");
}

#[test]
fn test_config_rejects_zero_ttl() {
    let args = Args {
        ttl_ms: Some(0),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}

#[test]
fn test_config_builds_working_sessions() {
    let file = config_file(r#"{"session": {"policy": "fast", "salt": "abc123", "ttl_ms": 10}}"#);
    let config = Config::from_file(file.path()).unwrap();

    let (sessions, store) = config.memory_session_store::<Option<i32>>().unwrap();
    let token = sessions.add(None).unwrap();
    assert_eq!(store.count(), Ok(1));

    std::thread::sleep(Duration::from_millis(20));
    assert!(sessions.get(&token).unwrap_err().is_invalid_token());
}

#[test]
fn test_config_secure_requires_salt() {
    let config = Config::default();

    assert_eq!(
        config.memory_session_store::<u8>().unwrap_err(),
        BuildError::EmptySalt(SalterPolicy::Secure)
    );
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let mut original = Config::default();
    original.session.policy = SalterPolicy::Fast;
    original.session.salt = "roundtrip".to_string();

    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.session.policy, loaded.session.policy);
    assert_eq!(original.session.salt, loaded.session.salt);
    assert_eq!(original.session.ttl_ms, loaded.session.ttl_ms);
}

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"logging": {"level": "warn"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.session.policy, SalterPolicy::Secure); // Default
    assert_eq!(config.session.ttl_ms, 30 * 60 * 1000); // Default
}
