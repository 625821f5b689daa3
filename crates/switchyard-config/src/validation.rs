// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every violation instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of: {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let base_url = config.gateway.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "gateway.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.gateway.timeout_secs == 0 {
        fail("gateway.timeout_secs must be at least 1".to_string());
    }

    for (key, path) in [
        ("gateway.catalog_path", &config.gateway.catalog_path),
        ("gateway.estimate_path", &config.gateway.estimate_path),
        ("gateway.pricing_path", &config.gateway.pricing_path),
    ] {
        if !path.starts_with('/') {
            fail(format!("{key} `{path}` must start with `/`"));
        }
    }

    if config.rules.path.trim().is_empty() {
        fail("rules.path must not be empty".to_string());
    }

    if config.rules.refresh_interval_secs == 0 {
        fail("rules.refresh_interval_secs must be at least 1".to_string());
    }

    if config.selection.default_task_type.trim().is_empty() {
        fail("selection.default_task_type must not be empty".to_string());
    }

    let max_cost = config.selection.max_cost_usd;
    if !max_cost.is_finite() || max_cost < 0.0 {
        fail(format!(
            "selection.max_cost_usd must be a non-negative number, got {max_cost}"
        ));
    }

    if config.server.host.trim().is_empty() {
        fail("server.host must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &SwitchyardConfig) -> Vec<String> {
        validate_config(config)
            .err()
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&SwitchyardConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_http_gateway() {
        let mut config = SwitchyardConfig::default();
        config.gateway.base_url = "localhost:4000".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("gateway.base_url"));
    }

    #[test]
    fn rejects_negative_cost_and_zero_interval_together() {
        let mut config = SwitchyardConfig::default();
        config.selection.max_cost_usd = -1.0;
        config.rules.refresh_interval_secs = 0;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn rejects_relative_endpoint_path() {
        let mut config = SwitchyardConfig::default();
        config.gateway.estimate_path = "estimate".into();
        assert!(messages(&config)[0].contains("gateway.estimate_path"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = SwitchyardConfig::default();
        config.service.log_level = "verbose".into();
        assert!(messages(&config)[0].contains("service.log_level"));
    }
}
