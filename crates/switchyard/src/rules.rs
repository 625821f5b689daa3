// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard rules check`: validate a rule document without starting the engine.

use std::fmt::Write as _;
use std::path::Path;

use switchyard_core::SwitchyardError;
use switchyard_rules::{FileRuleSource, RuleSource, RuleTable};

pub async fn run_check(path: &Path) -> Result<(), SwitchyardError> {
    let table = FileRuleSource::new(path).load().await?;
    print!("{}", describe(path, &table));
    Ok(())
}

fn describe(path: &Path, table: &RuleTable) -> String {
    let mut out = format!("{}: {} rules OK\n", path.display(), table.len());
    for (task_type, rule) in table.iter() {
        let _ = write!(out, "  {task_type:<16} {}", rule.primary_model);
        if let Some(fallback) = &rule.fallback_model {
            let _ = write!(out, " (fallback {fallback})");
        }
        let _ = writeln!(
            out,
            ", temperature {}, max_tokens {}",
            rule.temperature, rule.max_tokens
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_test_utils::{SAMPLE_RULES_YAML, TempRulesFile, sample_rule_table};

    #[test]
    fn describes_each_rule() {
        let text = describe(Path::new("rules.yaml"), &sample_rule_table());
        assert!(text.starts_with("rules.yaml: 2 rules OK"));
        assert!(text.contains("summarize        gpt-4 (fallback gpt-3.5-turbo)"), "{text}");
        assert!(text.contains("max_tokens 512"));
    }

    #[tokio::test]
    async fn valid_file_passes() {
        let file = TempRulesFile::new(SAMPLE_RULES_YAML);
        run_check(file.path()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_default_fails() {
        let file = TempRulesFile::new("summarize:\n  model: gpt-4\n");
        let err = run_check(file.path()).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
