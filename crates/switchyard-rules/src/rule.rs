// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule definitions and rule document parsing.
//!
//! A rule document maps task types to model policies:
//!
//! ```yaml
//! default:
//!   model: gpt-3.5-turbo
//! summarize:
//!   model: gpt-4
//!   fallback: gpt-3.5-turbo
//!   max_tokens: 512
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use switchyard_core::{DEFAULT_TASK_TYPE, SwitchyardError};

/// Model policy for one task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Preferred model.
    #[serde(rename = "model", alias = "primary_model")]
    pub primary_model: String,

    /// Cheaper model used when the primary is projected over budget.
    #[serde(
        rename = "fallback",
        alias = "fallback_model",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_model: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Generation token cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Rule {
    /// Rule with the default sampling parameters and no fallback.
    pub fn new(primary_model: impl Into<String>) -> Self {
        Self {
            primary_model: primary_model.into(),
            fallback_model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn with_fallback(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn check(&self, task_type: &str, problems: &mut Vec<String>) {
        if self.primary_model.trim().is_empty() {
            problems.push(format!("rule `{task_type}`: model must not be empty"));
        }
        if let Some(fallback) = &self.fallback_model {
            if fallback.trim().is_empty() {
                problems.push(format!("rule `{task_type}`: fallback must not be empty"));
            }
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            problems.push(format!(
                "rule `{task_type}`: temperature {} is outside 0.0..=2.0",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            problems.push(format!("rule `{task_type}`: max_tokens must be positive"));
        }
    }
}

/// Serialization format of a rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Yaml,
    Toml,
}

impl RuleFormat {
    /// Pick the format from a file extension. Anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RuleFormat::Toml,
            _ => RuleFormat::Yaml,
        }
    }
}

/// A complete, validated rule table.
///
/// Construction guarantees a `default` entry and well-formed rules, so a
/// table that exists can always resolve a task type.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: BTreeMap<String, Rule>,
}

impl RuleTable {
    /// Validate and wrap a task-type mapping.
    pub fn new(rules: BTreeMap<String, Rule>) -> Result<Self, SwitchyardError> {
        let mut problems = Vec::new();

        if !rules.contains_key(DEFAULT_TASK_TYPE) {
            problems.push(format!("rule table has no `{DEFAULT_TASK_TYPE}` entry"));
        }
        for (task_type, rule) in &rules {
            if task_type.trim().is_empty() {
                problems.push("rule table has an empty task type key".to_string());
            }
            rule.check(task_type, &mut problems);
        }

        if problems.is_empty() {
            Ok(Self { rules })
        } else {
            Err(SwitchyardError::Configuration(problems.join("; ")))
        }
    }

    /// Parse and validate a rule document.
    pub fn parse(content: &str, format: RuleFormat) -> Result<Self, SwitchyardError> {
        let rules: BTreeMap<String, Rule> = match format {
            RuleFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                SwitchyardError::Configuration(format!("invalid YAML rule document: {e}"))
            })?,
            RuleFormat::Toml => toml::from_str(content).map_err(|e| {
                SwitchyardError::Configuration(format!("invalid TOML rule document: {e}"))
            })?,
        };
        Self::new(rules)
    }

    /// Rule for `task_type`, falling back to the `default` rule.
    ///
    /// An empty task type resolves to `default`.
    pub fn resolve(&self, task_type: &str) -> Result<&Rule, SwitchyardError> {
        self.rules
            .get(task_type)
            .or_else(|| self.rules.get(DEFAULT_TASK_TYPE))
            .ok_or_else(|| {
                SwitchyardError::Configuration(format!(
                    "rule table has no `{DEFAULT_TASK_TYPE}` entry"
                ))
            })
    }

    /// Rule configured for exactly `task_type`, without the default fallback.
    pub fn get(&self, task_type: &str) -> Option<&Rule> {
        self.rules.get(task_type)
    }

    pub fn contains(&self, task_type: &str) -> bool {
        self.rules.contains_key(task_type)
    }

    /// Task types in sorted order.
    pub fn task_types(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
