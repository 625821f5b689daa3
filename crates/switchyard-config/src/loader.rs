// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./switchyard.toml` > `~/.config/switchyard/switchyard.toml` > `/etc/switchyard/switchyard.toml`
//! with environment variable overrides via the `SWITCHYARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SwitchyardConfig;

/// Config sections addressable through `SWITCHYARD_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &[
    "service",
    "gateway",
    "rules",
    "selection",
    "estimator",
    "server",
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchyard/switchyard.toml`
/// 3. `~/.config/switchyard/switchyard.toml`
/// 4. `./switchyard.toml`
/// 5. Legacy `GATEWAY_URL` / `SELECTOR_RULES`
/// 6. `SWITCHYARD_*` environment variables
pub fn load_config() -> Result<SwitchyardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(SwitchyardConfig::default()));
    for path in config_file_candidates() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(legacy_env_provider()).merge(env_provider())
}

/// Config files in ascending precedence.
pub(crate) fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/switchyard/switchyard.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("switchyard/switchyard.toml"));
    }
    paths.push(PathBuf::from("switchyard.toml"));
    paths
}

/// Environment variables kept from earlier selector deployments.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["GATEWAY_URL", "SELECTOR_RULES"])
        .map(|key| {
            let mapped = match key.as_str().to_ascii_lowercase().as_str() {
                "gateway_url" => "gateway.base_url".to_string(),
                "selector_rules" => "rules.path".to_string(),
                other => other.to_string(),
            };
            mapped.into()
        })
}

/// `SWITCHYARD_GATEWAY_BASE_URL` -> `gateway.base_url`.
///
/// Only the section prefix is split off; key names keep their underscores.
fn env_provider() -> Env {
    Env::prefixed("SWITCHYARD_").map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                lower
                    .strip_prefix(*section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(lower);
        mapped.into()
    })
}
