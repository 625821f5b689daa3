// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-driven model selection with a single cost-based fallback.
//!
//! For each request the engine resolves the task type's rule, estimates the
//! primary model's cost, and swaps to the rule's fallback once if the primary
//! is over budget. Cost enforcement is best-effort: the engine always returns
//! a decision when the rule table is sound, even if every candidate is over
//! budget or every dependency is down.

use std::sync::Arc;
use std::time::Duration;

use switchyard_config::{EstimatorStrategy, SwitchyardConfig};
use switchyard_core::{
    DEFAULT_TASK_TYPE, Decision, GatewayApi, SelectionRequest, SwitchyardError,
};
use switchyard_gateway::GatewayClient;
use switchyard_rules::RuleStore;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::catalog::CatalogCache;
use crate::estimator::CostEstimator;

/// Selection engine shared by every caller in the process.
pub struct SelectionEngine {
    rules: RuleStore,
    catalog: CatalogCache,
    estimator: CostEstimator,
}

impl SelectionEngine {
    /// Assemble an engine around an opened rule store and a gateway.
    ///
    /// `gateway_timeout` bounds each catalog fetch and cost estimate.
    pub fn new(
        rules: RuleStore,
        gateway: Arc<dyn GatewayApi>,
        strategy: EstimatorStrategy,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            rules,
            catalog: CatalogCache::new(Arc::clone(&gateway), gateway_timeout),
            estimator: CostEstimator::new(gateway, strategy, gateway_timeout),
        }
    }

    /// Build an engine from configuration, talking to the configured gateway over HTTP.
    pub async fn from_config(config: &SwitchyardConfig) -> Result<Self, SwitchyardError> {
        let gateway = Arc::new(GatewayClient::new(&config.gateway)?);
        Self::from_config_with_gateway(config, gateway).await
    }

    /// Build an engine from configuration with a caller-supplied gateway.
    pub async fn from_config_with_gateway(
        config: &SwitchyardConfig,
        gateway: Arc<dyn GatewayApi>,
    ) -> Result<Self, SwitchyardError> {
        let rules = RuleStore::from_path(
            &config.rules.path,
            Duration::from_secs(config.rules.refresh_interval_secs),
        )
        .await?;
        Ok(Self::new(
            rules,
            gateway,
            config.estimator.strategy,
            Duration::from_secs(config.gateway.timeout_secs),
        ))
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    /// Pick a model and sampling parameters for `request`.
    ///
    /// Fails only for an invalid request or a rule table without a `default`
    /// rule. Catalog and estimator failures are logged and absorbed.
    pub async fn choose(&self, request: &SelectionRequest) -> Result<Decision, SwitchyardError> {
        request.validate()?;

        let task_type = if request.task_type.trim().is_empty() {
            DEFAULT_TASK_TYPE
        } else {
            request.task_type.as_str()
        };
        // deadline_secs is advisory: recorded on the span, never enforced.
        let span = info_span!(
            "select",
            task_type,
            deadline_secs = request.deadline_secs,
            max_cost = request.max_cost_usd,
        );

        self.select(request, task_type).instrument(span).await
    }

    async fn select(
        &self,
        request: &SelectionRequest,
        task_type: &str,
    ) -> Result<Decision, SwitchyardError> {
        let table = self.rules.rules().await;
        let rule = table.resolve(task_type)?;
        // Metric labels use the matched rule key so arbitrary task types
        // cannot grow label cardinality.
        let rule_key = if table.contains(task_type) {
            task_type
        } else {
            DEFAULT_TASK_TYPE
        };

        let mut candidate = rule.primary_model.as_str();

        match self.catalog.models().await {
            Ok(catalog) => match catalog.get(candidate) {
                Some(descriptor) => debug!(
                    model = candidate,
                    metadata = ?descriptor.metadata,
                    "primary model found in catalog"
                ),
                None => debug!(model = candidate, "primary model not listed in catalog"),
            },
            Err(e) => warn!(error = %e, "model catalog unavailable, selecting without it"),
        }

        let mut cost = self.estimator.estimate(&request.prompt, candidate).await;

        if cost > request.max_cost_usd {
            if let Some(fallback) = rule.fallback_model.as_deref() {
                debug!(
                    primary = candidate,
                    fallback,
                    cost,
                    max_cost = request.max_cost_usd,
                    "primary over budget, switching to fallback"
                );
                metrics::counter!("switchyard_fallback_total", "task_type" => rule_key.to_string())
                    .increment(1);
                candidate = fallback;
                cost = self.estimator.estimate(&request.prompt, candidate).await;
            }
        }

        info!(model = candidate, estimated_cost = cost, "selector pick");
        metrics::counter!("switchyard_decisions_total", "model" => candidate.to_string())
            .increment(1);

        Ok(Decision {
            model: candidate.to_string(),
            temperature: rule.temperature,
            max_tokens: rule.max_tokens,
        })
    }
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("rules", &self.rules)
            .field("strategy", &self.estimator.strategy())
            .finish_non_exhaustive()
    }
}
