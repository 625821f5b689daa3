// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the LLM gateway.
//!
//! Provides [`GatewayClient`], which implements [`GatewayApi`] over the
//! gateway's catalog, estimate and pricing endpoints. Every call is bounded
//! by the configured timeout. Failures are returned as errors; turning them
//! into degraded behaviour is the engine's job.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use switchyard_config::GatewayConfig;
use switchyard_core::{CostEstimate, GatewayApi, ModelDescriptor, SwitchyardError};
use tracing::debug;

use crate::types::{
    EstimateRequest, EstimateResponse, ModelListResponse, PricingRequest, PricingResponse,
};

/// Gateway client backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    catalog_path: String,
    estimate_path: String,
    pricing_path: String,
    timeout: Duration,
}

impl GatewayClient {
    /// Build a client from the `[gateway]` configuration section.
    pub fn new(config: &GatewayConfig) -> Result<Self, SwitchyardError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwitchyardError::Configuration(format!(
                "failed to build gateway HTTP client: {e}"
            )))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            catalog_path: config.catalog_path.clone(),
            estimate_path: config.estimate_path.clone(),
            pricing_path: config.pricing_path.clone(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout applied to every gateway call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body from a 2xx response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, SwitchyardError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, endpoint))?;

        let status = response.status();
        debug!(status = %status, endpoint, "gateway response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SwitchyardError::Gateway {
                message: format!("{endpoint} returned {status}: {body}"),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, endpoint))?;
        serde_json::from_str(&body).map_err(|e| SwitchyardError::Gateway {
            message: format!("malformed {endpoint} response: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, e: reqwest::Error, endpoint: &str) -> SwitchyardError {
        if e.is_timeout() {
            SwitchyardError::Timeout {
                duration: self.timeout,
            }
        } else {
            SwitchyardError::Gateway {
                message: format!("{endpoint} request failed: {e}"),
                status: e.status().map(|s| s.as_u16()),
                source: Some(Box::new(e)),
            }
        }
    }
}

#[async_trait]
impl GatewayApi for GatewayClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SwitchyardError> {
        let request = self.client.get(self.url(&self.catalog_path));
        let list: ModelListResponse = self.send_json(request, &self.catalog_path).await?;
        debug!(models = list.data.len(), "gateway catalog fetched");
        Ok(list.data)
    }

    async fn estimate_cost(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<CostEstimate, SwitchyardError> {
        let request = self
            .client
            .post(self.url(&self.estimate_path))
            .json(&EstimateRequest { prompt, model });
        let response: EstimateResponse = self.send_json(request, &self.estimate_path).await?;
        Ok(CostEstimate {
            estimated_cost: response.estimated_cost,
            tokens: response.tokens,
        })
    }

    async fn price_per_1k(&self, model: &str) -> Result<f64, SwitchyardError> {
        let request = self
            .client
            .post(self.url(&self.pricing_path))
            .json(&PricingRequest { model });
        let response: PricingResponse = self.send_json(request, &self.pricing_path).await?;
        Ok(response.price_per_1k)
    }
}
