// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Switchyard configuration system.

use switchyard_config::diagnostic::ConfigError;
use switchyard_config::{
    EstimatorStrategy, SwitchyardConfig, load_and_validate_str, load_config_from_str,
};

/// A fully populated TOML document deserializes field for field.
#[test]
fn full_document_deserializes() {
    let toml = r#"
[service]
log_level = "debug"

[gateway]
base_url = "http://lite_proxy:4000"
timeout_secs = 3
catalog_path = "/v1/models"
estimate_path = "/estimate"
pricing_path = "/pricing"

[rules]
path = "/etc/switchyard/rules.yaml"
refresh_interval_secs = 15

[selection]
default_task_type = "chat"
deadline_secs = 30
max_cost_usd = 0.25

[estimator]
strategy = "pricing"

[server]
host = "0.0.0.0"
port = 9000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.gateway.base_url, "http://lite_proxy:4000");
    assert_eq!(config.gateway.timeout_secs, 3);
    assert_eq!(config.rules.path, "/etc/switchyard/rules.yaml");
    assert_eq!(config.rules.refresh_interval_secs, 15);
    assert_eq!(config.selection.default_task_type, "chat");
    assert_eq!(config.selection.deadline_secs, 30);
    assert!((config.selection.max_cost_usd - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.estimator.strategy, EstimatorStrategy::Pricing);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_document_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config, SwitchyardConfig::default());
    assert_eq!(config.selection.default_task_type, "default");
    assert_eq!(config.selection.deadline_secs, 60);
    assert!((config.selection.max_cost_usd - 0.10).abs() < f64::EPSILON);
    assert_eq!(config.estimator.strategy, EstimatorStrategy::Remote);
}

/// A misspelled key is rejected and a correction is offered.
#[test]
fn misspelled_key_gets_suggestion() {
    let toml = r#"
[rules]
refresh_interval_sec = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "refresh_interval_sec");
            assert_eq!(suggestion.as_deref(), Some("refresh_interval_secs"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// An unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// A value of the wrong type produces an InvalidType diagnostic.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("string port must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

/// Unknown estimator strategies are rejected at parse time.
#[test]
fn unknown_strategy_is_rejected() {
    let toml = r#"
[estimator]
strategy = "psychic"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[gateway]
base_url = "ftp://gateway"
timeout_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2, "got: {errors:?}");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}
