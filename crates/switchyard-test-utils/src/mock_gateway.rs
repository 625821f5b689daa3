// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM gateway for deterministic testing.
//!
//! `MockGateway` implements `GatewayApi` with configurable per-model costs,
//! switchable failures, and an optional delay, and records every call so
//! tests can assert how often the engine reached the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use switchyard_core::{CostEstimate, GatewayApi, ModelDescriptor, SwitchyardError};

/// A gateway double with scripted answers.
///
/// Models without a configured estimate or price cost `0.0`.
#[derive(Default)]
pub struct MockGateway {
    estimates: Mutex<HashMap<String, f64>>,
    prices: Mutex<HashMap<String, f64>>,
    models: Mutex<Vec<ModelDescriptor>>,
    delay: Mutex<Option<Duration>>,
    estimated_models: Mutex<Vec<String>>,
    fail_catalog: AtomicBool,
    fail_estimates: AtomicBool,
    fail_pricing: AtomicBool,
    catalog_calls: AtomicUsize,
    estimate_calls: AtomicUsize,
    pricing_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `/estimate` for `model` with `cost`.
    pub fn with_estimate(mut self, model: &str, cost: f64) -> Self {
        self.estimates.get_mut().insert(model.to_string(), cost);
        self
    }

    /// Answer `/pricing` for `model` with `price_per_1k`.
    pub fn with_price(mut self, model: &str, price_per_1k: f64) -> Self {
        self.prices.get_mut().insert(model.to_string(), price_per_1k);
        self
    }

    /// Serve a catalog listing the given model ids.
    pub fn with_models(mut self, ids: &[&str]) -> Self {
        *self.models.get_mut() = ids.iter().map(|id| ModelDescriptor::new(*id)).collect();
        self
    }

    /// Delay every call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        *self.delay.get_mut() = Some(delay);
        self
    }

    pub async fn set_estimate(&self, model: &str, cost: f64) {
        self.estimates.lock().await.insert(model.to_string(), cost);
    }

    pub fn fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    pub fn fail_estimates(&self, fail: bool) {
        self.fail_estimates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_pricing(&self, fail: bool) {
        self.fail_pricing.store(fail, Ordering::SeqCst);
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn estimate_calls(&self) -> usize {
        self.estimate_calls.load(Ordering::SeqCst)
    }

    pub fn pricing_calls(&self) -> usize {
        self.pricing_calls.load(Ordering::SeqCst)
    }

    /// Models passed to `estimate_cost`, in call order.
    pub async fn estimated_models(&self) -> Vec<String> {
        self.estimated_models.lock().await.clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn unavailable(endpoint: &str) -> SwitchyardError {
        SwitchyardError::Gateway {
            message: format!("mock {endpoint} unavailable"),
            status: Some(503),
            source: None,
        }
    }
}

#[async_trait]
impl GatewayApi for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, SwitchyardError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(Self::unavailable("catalog"));
        }
        Ok(self.models.lock().await.clone())
    }

    async fn estimate_cost(
        &self,
        _prompt: &str,
        model: &str,
    ) -> Result<CostEstimate, SwitchyardError> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        self.estimated_models.lock().await.push(model.to_string());
        self.pause().await;
        if self.fail_estimates.load(Ordering::SeqCst) {
            return Err(Self::unavailable("estimate"));
        }
        let cost = self.estimates.lock().await.get(model).copied().unwrap_or(0.0);
        Ok(CostEstimate {
            estimated_cost: cost,
            tokens: None,
        })
    }

    async fn price_per_1k(&self, model: &str) -> Result<f64, SwitchyardError> {
        self.pricing_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_pricing.load(Ordering::SeqCst) {
            return Err(Self::unavailable("pricing"));
        }
        Ok(self.prices.lock().await.get(model).copied().unwrap_or(0.0))
    }
}
