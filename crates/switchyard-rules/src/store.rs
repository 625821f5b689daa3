// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hot-reloading rule store.
//!
//! Reloads are lazy: every access checks whether the refresh interval has
//! passed since the last reload attempt and, if so, re-reads the source.
//! There is no background timer, so an idle store can stay stale for longer
//! than the interval.
//!
//! Readers get an `Arc<RuleTable>` snapshot from an [`ArcSwap`], so a reload
//! is visible all at once or not at all. The check-reload-publish sequence
//! runs under a mutex and re-checks staleness after acquiring it, which means
//! a burst of concurrent callers triggers exactly one reload.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use arc_swap::{ArcSwap, ArcSwapOption};
use switchyard_core::SwitchyardError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::rule::RuleTable;
use crate::source::{FileRuleSource, RuleSource};

/// Default staleness bound for the rule table.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Process-wide rule table with lazy, pull-based reload.
pub struct RuleStore {
    source: Arc<dyn RuleSource>,
    table: ArcSwap<RuleTable>,
    refresh_interval: Duration,
    /// Reference point for `checked_at_ms`.
    epoch: Instant,
    /// Milliseconds after `epoch` of the last reload attempt.
    checked_at_ms: AtomicU64,
    reload_lock: Mutex<()>,
    last_error: ArcSwapOption<String>,
}

impl RuleStore {
    /// Load the initial table from `source`.
    ///
    /// Any failure here is a [`SwitchyardError::Configuration`]: without a
    /// first good table the engine cannot start.
    pub async fn open(
        source: Arc<dyn RuleSource>,
        refresh_interval: Duration,
    ) -> Result<Self, SwitchyardError> {
        let table = source.load().await.map_err(|e| match e {
            SwitchyardError::Configuration(msg) => SwitchyardError::Configuration(msg),
            other => SwitchyardError::Configuration(format!(
                "initial rule load from {} failed: {other}",
                source.describe()
            )),
        })?;

        info!(
            source = %source.describe(),
            rules = table.len(),
            refresh_secs = refresh_interval.as_secs_f64(),
            "rule table loaded"
        );

        Ok(Self {
            source,
            table: ArcSwap::from_pointee(table),
            refresh_interval,
            epoch: Instant::now(),
            checked_at_ms: AtomicU64::new(0),
            reload_lock: Mutex::new(()),
            last_error: ArcSwapOption::empty(),
        })
    }

    /// Open a store backed by a rule file.
    pub async fn from_path(
        path: impl Into<PathBuf>,
        refresh_interval: Duration,
    ) -> Result<Self, SwitchyardError> {
        Self::open(Arc::new(FileRuleSource::new(path)), refresh_interval).await
    }

    /// The current table, reloading first if it is stale.
    ///
    /// Never fails: a failed reload keeps the last good table.
    pub async fn rules(&self) -> Arc<RuleTable> {
        if self.is_stale() {
            let _guard = self.reload_lock.lock().await;
            // Another caller may have reloaded while we waited.
            if self.is_stale() {
                // Failures are logged, counted and kept in `last_error` by
                // `reload_locked`; readers keep the last good table.
                if let Err(e) = self.reload_locked().await {
                    debug!(error = %e, "serving last good rule table");
                }
            }
        }
        self.table.load_full()
    }

    /// The current table without a staleness check.
    pub fn snapshot(&self) -> Arc<RuleTable> {
        self.table.load_full()
    }

    /// Reload immediately, regardless of the refresh interval.
    ///
    /// On failure the previous table stays in effect and the error is returned
    /// as [`SwitchyardError::ReloadFailure`].
    pub async fn reload_now(&self) -> Result<Arc<RuleTable>, SwitchyardError> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    /// Message of the most recent failed reload, cleared by the next success.
    pub fn last_reload_error(&self) -> Option<String> {
        self.last_error.load_full().map(|msg| msg.as_ref().clone())
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn is_stale(&self) -> bool {
        let since = self
            .elapsed_ms()
            .saturating_sub(self.checked_at_ms.load(Ordering::Acquire));
        u128::from(since) > self.refresh_interval.as_millis()
    }

    /// Caller must hold `reload_lock`.
    async fn reload_locked(&self) -> Result<Arc<RuleTable>, SwitchyardError> {
        let result = self.source.load().await;
        // Failed attempts also restart the clock so a broken file is retried
        // once per interval, not on every call.
        self.checked_at_ms
            .store(self.elapsed_ms(), Ordering::Release);

        match result {
            Ok(table) => {
                let table = Arc::new(table);
                let previous = self.table.swap(Arc::clone(&table));
                self.last_error.store(None);
                metrics::counter!("switchyard_rule_reloads_total").increment(1);
                if *previous != *table {
                    info!(
                        source = %self.source.describe(),
                        rules = table.len(),
                        "rule table changed on reload"
                    );
                } else {
                    debug!(source = %self.source.describe(), "rule table unchanged");
                }
                Ok(table)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(
                    source = %self.source.describe(),
                    error = %message,
                    "rule reload failed, keeping last good table"
                );
                metrics::counter!("switchyard_rule_reload_failures_total").increment(1);
                self.last_error.store(Some(Arc::new(message.clone())));
                Err(SwitchyardError::ReloadFailure {
                    source_name: self.source.describe(),
                    message,
                })
            }
        }
    }
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("source", &self.source.describe())
            .field("refresh_interval", &self.refresh_interval)
            .field("rules", &self.table.load().len())
            .finish()
    }
}
