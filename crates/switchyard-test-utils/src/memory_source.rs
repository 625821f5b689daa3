// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory rule source whose contents tests can swap at will.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use switchyard_core::SwitchyardError;
use switchyard_rules::{RuleSource, RuleTable};

/// Serves a settable rule table, or a scripted failure.
pub struct MemoryRuleSource {
    current: Mutex<Result<RuleTable, String>>,
    loads: AtomicUsize,
}

impl MemoryRuleSource {
    pub fn new(table: RuleTable) -> Self {
        Self {
            current: Mutex::new(Ok(table)),
            loads: AtomicUsize::new(0),
        }
    }

    /// Replace the table served by the next load.
    pub async fn set(&self, table: RuleTable) {
        *self.current.lock().await = Ok(table);
    }

    /// Make subsequent loads fail with `message`.
    pub async fn break_with(&self, message: &str) {
        *self.current.lock().await = Err(message.to_string());
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleSource for MemoryRuleSource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load(&self) -> Result<RuleTable, SwitchyardError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.current
            .lock()
            .await
            .clone()
            .map_err(SwitchyardError::Configuration)
    }
}
