// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt cost estimation with an optimistic failure policy.
//!
//! [`CostEstimator::estimate`] never fails: when the gateway is slow, down,
//! or returns nonsense, the prompt is treated as free (`0.0`) so selection
//! can proceed with the primary model. Every such degradation is logged and
//! counted. [`CostEstimator::try_estimate`] is the strict variant for callers
//! that want to see the error.

use std::sync::Arc;
use std::time::Duration;

use switchyard_config::EstimatorStrategy;
use switchyard_core::{CostEstimate, GatewayApi, SwitchyardError};
use tracing::{debug, warn};

use crate::tokens::TokenCounter;

pub struct CostEstimator {
    gateway: Arc<dyn GatewayApi>,
    strategy: EstimatorStrategy,
    timeout: Duration,
    tokens: TokenCounter,
}

impl CostEstimator {
    pub fn new(gateway: Arc<dyn GatewayApi>, strategy: EstimatorStrategy, timeout: Duration) -> Self {
        Self {
            gateway,
            strategy,
            timeout,
            tokens: TokenCounter::new(),
        }
    }

    pub fn strategy(&self) -> EstimatorStrategy {
        self.strategy
    }

    /// Projected cost in USD of sending `prompt` to `model`, or `0.0` on any failure.
    pub async fn estimate(&self, prompt: &str, model: &str) -> f64 {
        match self.try_estimate(prompt, model).await {
            Ok(estimate) => estimate.estimated_cost,
            Err(e) => {
                warn!(model, error = %e, "cost estimate unavailable, assuming zero cost");
                metrics::counter!(
                    "switchyard_estimate_degraded_total",
                    "model" => model.to_string()
                )
                .increment(1);
                0.0
            }
        }
    }

    /// Projected cost, reporting failures as [`SwitchyardError::EstimationDegraded`].
    ///
    /// Negative and non-finite costs from the gateway are rejected.
    pub async fn try_estimate(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<CostEstimate, SwitchyardError> {
        let degraded = |message: String| SwitchyardError::EstimationDegraded {
            model: model.to_string(),
            message,
        };

        let estimate = match tokio::time::timeout(self.timeout, self.request(prompt, model)).await {
            Ok(Ok(estimate)) => estimate,
            Ok(Err(e)) => return Err(degraded(e.to_string())),
            Err(_) => return Err(degraded(format!("timed out after {:?}", self.timeout))),
        };

        if !estimate.estimated_cost.is_finite() || estimate.estimated_cost < 0.0 {
            return Err(degraded(format!(
                "gateway returned invalid cost {}",
                estimate.estimated_cost
            )));
        }

        debug!(
            model,
            cost = estimate.estimated_cost,
            strategy = %self.strategy,
            "cost estimated"
        );
        Ok(estimate)
    }

    async fn request(&self, prompt: &str, model: &str) -> Result<CostEstimate, SwitchyardError> {
        match self.strategy {
            EstimatorStrategy::Remote => self.gateway.estimate_cost(prompt, model).await,
            EstimatorStrategy::Pricing => {
                let tokens = self.tokens.count(model, prompt)?;
                let price_per_1k = self.gateway.price_per_1k(model).await?;
                Ok(CostEstimate {
                    estimated_cost: tokens as f64 * price_per_1k / 1000.0,
                    tokens: Some(tokens as u64),
                })
            }
        }
    }
}
