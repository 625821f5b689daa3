// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway trait for the remote service that brokers LLM backends.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::{CostEstimate, ModelDescriptor};

/// Access to the LLM gateway's catalog and pricing endpoints.
///
/// Implementations report every failure as an error. Deciding what a failure
/// means for a selection call is left to the engine.
#[async_trait]
pub trait GatewayApi: Send + Sync + 'static {
    /// Human-readable name of this gateway (used in logs).
    fn name(&self) -> &str;

    /// Fetch the list of models the gateway currently serves.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SwitchyardError>;

    /// Ask the gateway to project the cost of sending `prompt` to `model`.
    async fn estimate_cost(&self, prompt: &str, model: &str)
        -> Result<CostEstimate, SwitchyardError>;

    /// Price in USD per thousand prompt tokens for `model`.
    async fn price_per_1k(&self, model: &str) -> Result<f64, SwitchyardError>;
}
