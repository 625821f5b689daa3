// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot cache of the gateway's model catalog.
//!
//! The catalog is fetched at most once per cache lifetime and never expires
//! on its own. Concurrent first callers share a single fetch. A failed fetch
//! is remembered for a short backoff: callers queued behind it, and callers
//! arriving during the backoff, get the same failure without another network
//! round trip. After the backoff the next caller tries again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use arc_swap::{ArcSwap, ArcSwapOption};
use switchyard_core::{GatewayApi, ModelCatalog, SwitchyardError};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// How long a failed catalog fetch is reused before the gateway is asked again.
pub const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(5);

struct FetchFailure {
    at: Instant,
    message: String,
}

pub struct CatalogCache {
    gateway: Arc<dyn GatewayApi>,
    /// Swapped for a fresh cell on invalidation.
    cell: ArcSwap<OnceCell<Arc<ModelCatalog>>>,
    timeout: Duration,
    failure_backoff: Duration,
    last_failure: ArcSwapOption<FetchFailure>,
    fetches: AtomicU64,
}

impl CatalogCache {
    pub fn new(gateway: Arc<dyn GatewayApi>, timeout: Duration) -> Self {
        Self {
            gateway,
            cell: ArcSwap::from_pointee(OnceCell::new()),
            timeout,
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
            last_failure: ArcSwapOption::empty(),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn with_failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = backoff;
        self
    }

    /// The cached catalog, fetching it first if this is the first use.
    ///
    /// Fails with [`SwitchyardError::CatalogUnavailable`] when the fetch
    /// fails or exceeds the timeout, or when a fetch failed within the
    /// backoff window. A caller waits for at most one fetch timeout.
    pub async fn models(&self) -> Result<Arc<ModelCatalog>, SwitchyardError> {
        let cell = self.cell.load_full();
        if let Some(catalog) = cell.get() {
            return Ok(Arc::clone(catalog));
        }
        self.check_backoff()?;
        let catalog = cell.get_or_try_init(|| self.fetch()).await?;
        Ok(Arc::clone(catalog))
    }

    /// The cached catalog if one has been fetched, without touching the network.
    pub fn cached(&self) -> Option<Arc<ModelCatalog>> {
        self.cell.load().get().cloned()
    }

    /// Drop the cached catalog so the next call fetches again.
    pub fn invalidate(&self) {
        self.cell.store(Arc::new(OnceCell::new()));
        self.last_failure.store(None);
        debug!("model catalog invalidated");
    }

    /// Number of fetches issued, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Fail fast if a fetch failed within the backoff window.
    fn check_backoff(&self) -> Result<(), SwitchyardError> {
        match self.last_failure.load_full() {
            Some(failure) if failure.at.elapsed() < self.failure_backoff => {
                Err(SwitchyardError::CatalogUnavailable {
                    message: format!("{} (retry pending)", failure.message),
                    source: None,
                })
            }
            _ => Ok(()),
        }
    }

    async fn fetch(&self) -> Result<Arc<ModelCatalog>, SwitchyardError> {
        // Waiters queued on the cell run this after an earlier fetch failed.
        self.check_backoff()?;
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let listed = tokio::time::timeout(self.timeout, self.gateway.list_models())
            .await
            .map_err(|_| SwitchyardError::Timeout {
                duration: self.timeout,
            })
            .and_then(|result| result);

        match listed {
            Ok(descriptors) => {
                self.last_failure.store(None);
                let catalog = ModelCatalog::from_descriptors(descriptors);
                info!(
                    gateway = self.gateway.name(),
                    models = catalog.len(),
                    "model catalog cached"
                );
                Ok(Arc::new(catalog))
            }
            Err(e) => {
                let message = e.to_string();
                self.last_failure.store(Some(Arc::new(FetchFailure {
                    at: Instant::now(),
                    message: message.clone(),
                })));
                Err(SwitchyardError::CatalogUnavailable {
                    message,
                    source: Some(Box::new(e)),
                })
            }
        }
    }
}
