// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchyard.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Switchyard configuration.
///
/// All sections are optional and default to values that match a gateway
/// running on `localhost:4000` with rules in `infra/lite_llm/rules.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Process-level settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// LLM gateway endpoints and timeouts.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Rule document location and reload cadence.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Defaults applied to selection calls that leave a field unset.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Cost estimation strategy.
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// HTTP façade bind settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// LLM gateway configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the gateway, without a trailing path.
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    /// Upper bound in seconds for any single gateway call.
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,

    /// Path of the model catalog endpoint.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path of the cost estimate endpoint.
    #[serde(default = "default_estimate_path")]
    pub estimate_path: String,

    /// Path of the per-model pricing endpoint.
    #[serde(default = "default_pricing_path")]
    pub pricing_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            timeout_secs: default_gateway_timeout(),
            catalog_path: default_catalog_path(),
            estimate_path: default_estimate_path(),
            pricing_path: default_pricing_path(),
        }
    }
}

fn default_gateway_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_gateway_timeout() -> u64 {
    5
}

fn default_catalog_path() -> String {
    "/v1/models".to_string()
}

fn default_estimate_path() -> String {
    "/estimate".to_string()
}

fn default_pricing_path() -> String {
    "/pricing".to_string()
}

/// Rule document configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Path to the rule document (`.yaml`, `.yml` or `.toml`).
    #[serde(default = "default_rules_path")]
    pub path: String,

    /// Seconds after which the next access re-reads the rule document.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_rules_path() -> String {
    "infra/lite_llm/rules.yaml".to_string()
}

fn default_refresh_interval() -> u64 {
    10
}

/// Defaults for selection calls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Task type used when the caller does not name one.
    #[serde(default = "default_task_type")]
    pub default_task_type: String,

    /// Advisory deadline in seconds.
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,

    /// Cost ceiling in USD before the fallback model is preferred.
    #[serde(default = "default_max_cost")]
    pub max_cost_usd: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_task_type: default_task_type(),
            deadline_secs: default_deadline(),
            max_cost_usd: default_max_cost(),
        }
    }
}

fn default_task_type() -> String {
    "default".to_string()
}

fn default_deadline() -> u64 {
    60
}

fn default_max_cost() -> f64 {
    0.10
}

/// How prompt cost is projected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstimatorStrategy {
    /// Ask the gateway's estimate endpoint for the full cost.
    #[default]
    Remote,
    /// Count tokens locally and multiply by the gateway's per-1k price.
    Pricing,
}

/// Cost estimator configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Estimation strategy (`remote` or `pricing`).
    #[serde(default)]
    pub strategy: EstimatorStrategy,
}

/// HTTP façade configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn strategy_parses_lowercase() {
        assert_eq!(
            EstimatorStrategy::from_str("pricing").unwrap(),
            EstimatorStrategy::Pricing
        );
        assert_eq!(EstimatorStrategy::Remote.to_string(), "remote");
    }

    #[test]
    fn defaults_follow_legacy_selector() {
        let c = SwitchyardConfig::default();
        assert_eq!(c.gateway.base_url, "http://localhost:4000");
        assert_eq!(c.rules.path, "infra/lite_llm/rules.yaml");
        assert_eq!(c.rules.refresh_interval_secs, 10);
        assert_eq!(c.gateway.timeout_secs, 5);
    }
}
