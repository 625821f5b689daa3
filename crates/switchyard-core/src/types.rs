// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types passed between the selection engine, the gateway client, and callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SwitchyardError;

/// Task type used when a request does not name one.
pub const DEFAULT_TASK_TYPE: &str = "default";

/// One model advertised by the gateway catalog.
///
/// Only `id` is interpreted. Everything else the gateway sends (pricing tier,
/// context length, owner) is carried along untouched in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ModelDescriptor {
    /// Descriptor with no metadata.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// Point-in-time snapshot of the gateway catalog, keyed by model id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    models: HashMap<String, ModelDescriptor>,
}

impl ModelCatalog {
    /// Build a catalog from the gateway's descriptor list. Later duplicates win.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let models = descriptors
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        Self { models }
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Model ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Descriptors sorted by id.
    pub fn descriptors(&self) -> Vec<&ModelDescriptor> {
        let mut all: Vec<&ModelDescriptor> = self.models.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

/// Gateway answer to a cost estimate request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Projected cost in currency units (USD).
    pub estimated_cost: f64,
    /// Prompt token count, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
}

/// A single selection call.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub prompt: String,
    pub task_type: String,
    /// Soft time budget in seconds. Recorded, never enforced.
    pub deadline_secs: u64,
    /// Cost ceiling in USD above which the fallback model is preferred.
    pub max_cost_usd: f64,
}

impl SelectionRequest {
    /// Request with the stock defaults: `default` task, 60 s, $0.10.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            task_type: DEFAULT_TASK_TYPE.to_string(),
            deadline_secs: 60,
            max_cost_usd: 0.10,
        }
    }

    pub fn task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    pub fn deadline_secs(mut self, secs: u64) -> Self {
        self.deadline_secs = secs;
        self
    }

    pub fn max_cost_usd(mut self, usd: f64) -> Self {
        self.max_cost_usd = usd;
        self
    }

    /// Reject requests that break the caller contract.
    ///
    /// An empty task type is treated as `default` by the engine and is not an error.
    pub fn validate(&self) -> Result<(), SwitchyardError> {
        if self.prompt.trim().is_empty() {
            return Err(SwitchyardError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }
        if !self.max_cost_usd.is_finite() || self.max_cost_usd < 0.0 {
            return Err(SwitchyardError::InvalidRequest(format!(
                "max_cost_usd must be a non-negative number, got {}",
                self.max_cost_usd
            )));
        }
        Ok(())
    }
}

/// The engine's answer: which model to call and how to sample it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}
