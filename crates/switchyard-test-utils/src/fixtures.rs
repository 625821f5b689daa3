// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule documents and rule files shared across test suites.

use std::path::{Path, PathBuf};

use switchyard_rules::{RuleFormat, RuleTable};
use tempfile::TempDir;

/// Two-rule table: a plain `default` and a `summarize` rule with a fallback.
pub const SAMPLE_RULES_YAML: &str = r#"
default:
  model: gpt-3.5-turbo
  temperature: 0.7
  max_tokens: 1024
summarize:
  model: gpt-4
  fallback: gpt-3.5-turbo
  max_tokens: 512
"#;

/// Parsed [`SAMPLE_RULES_YAML`].
pub fn sample_rule_table() -> RuleTable {
    parse_yaml(SAMPLE_RULES_YAML)
}

/// Parse a YAML rule document, panicking on invalid input.
pub fn parse_yaml(doc: &str) -> RuleTable {
    RuleTable::parse(doc, RuleFormat::Yaml).expect("fixture rule document must be valid")
}

/// A rule file in its own temporary directory, removed on drop.
pub struct TempRulesFile {
    _dir: TempDir,
    path: PathBuf,
}

impl TempRulesFile {
    /// Write `content` to `rules.yaml` in a fresh temporary directory.
    pub fn new(content: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, content).expect("write rules file");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents in one step.
    pub fn rewrite(&self, content: &str) {
        let tmp = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp, content).expect("write rules file");
        std::fs::rename(&tmp, &self.path).expect("replace rules file");
    }
}
