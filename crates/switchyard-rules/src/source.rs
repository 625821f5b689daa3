// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing sources for the rule store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use switchyard_core::SwitchyardError;

use crate::rule::{RuleFormat, RuleTable};

/// Somewhere a complete rule table can be (re)read from.
///
/// Every call to [`RuleSource::load`] re-reads the whole document; there is
/// no incremental diffing.
#[async_trait]
pub trait RuleSource: Send + Sync + 'static {
    /// Short description for logs, e.g. the file path.
    fn describe(&self) -> String;

    /// Read, parse and validate the current rule table.
    async fn load(&self) -> Result<RuleTable, SwitchyardError>;
}

/// Rule document stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
    format: RuleFormat,
}

impl FileRuleSource {
    /// Source for `path`, with the format inferred from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = RuleFormat::from_path(&path);
        Self { path, format }
    }

    /// Override the inferred format.
    pub fn with_format(mut self, format: RuleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleSource for FileRuleSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<RuleTable, SwitchyardError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SwitchyardError::Configuration(format!(
                "failed to read rule file {}: {e}",
                self.path.display()
            ))
        })?;
        RuleTable::parse(&content, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, "default:\n  model: gpt-3.5-turbo\n").unwrap();

        let table = FileRuleSource::new(&path).load().await.unwrap();
        assert_eq!(table.resolve("any").unwrap().primary_model, "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn explicit_format_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.conf");
        std::fs::write(&path, "[default]\nmodel = \"gpt-4\"\n").unwrap();

        let table = FileRuleSource::new(&path)
            .with_format(RuleFormat::Toml)
            .load()
            .await
            .unwrap();
        assert_eq!(table.resolve("default").unwrap().primary_model, "gpt-4");
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRuleSource::new(dir.path().join("absent.yaml"));
        let err = source.load().await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("absent.yaml"));
    }
}
