// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embeddable decision facade.
//!
//! [`Selector`] is a cheap handle onto one shared [`SelectionEngine`], so the
//! rule store's reload cadence and the catalog's one-shot fetch are shared by
//! every call site. [`LlmChoice`] lets any type that can reach a selector
//! offer `llm_choice` to its own callers.

use std::sync::Arc;

use async_trait::async_trait;
use switchyard_config::{SelectionConfig, SwitchyardConfig};
use switchyard_core::{DEFAULT_TASK_TYPE, Decision, SelectionRequest, SwitchyardError};
use tokio::sync::OnceCell;
use tokio::sync::SetError;
use tracing::info;

use crate::engine::SelectionEngine;

static GLOBAL: OnceCell<Selector> = OnceCell::const_new();

/// Per-call selection constraints.
///
/// Defaults: task type `default`, 60 second deadline, $0.10 cost ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct ChooseOptions {
    pub task_type: String,
    pub deadline_secs: u64,
    pub max_cost_usd: f64,
}

impl Default for ChooseOptions {
    fn default() -> Self {
        Self {
            task_type: DEFAULT_TASK_TYPE.to_string(),
            deadline_secs: 60,
            max_cost_usd: 0.10,
        }
    }
}

impl ChooseOptions {
    pub fn from_config(config: &SelectionConfig) -> Self {
        Self {
            task_type: config.default_task_type.clone(),
            deadline_secs: config.deadline_secs,
            max_cost_usd: config.max_cost_usd,
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

    fn into_request(self, prompt: &str) -> SelectionRequest {
        SelectionRequest::new(prompt)
            .task_type(self.task_type)
            .deadline_secs(self.deadline_secs)
            .max_cost_usd(self.max_cost_usd)
    }
}

/// Shared handle onto a selection engine.
#[derive(Debug, Clone)]
pub struct Selector {
    engine: Arc<SelectionEngine>,
    defaults: ChooseOptions,
}

impl Selector {
    pub fn new(engine: Arc<SelectionEngine>) -> Self {
        Self {
            engine,
            defaults: ChooseOptions::default(),
        }
    }

    /// Replace the options used by [`Selector::choose`].
    pub fn with_defaults(mut self, defaults: ChooseOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Build a selector, and its engine, from configuration.
    pub async fn from_config(config: &SwitchyardConfig) -> Result<Self, SwitchyardError> {
        let engine = SelectionEngine::from_config(config).await?;
        Ok(Self::new(Arc::new(engine))
            .with_defaults(ChooseOptions::from_config(&config.selection)))
    }

    /// The process-wide selector.
    ///
    /// Built from the standard configuration hierarchy on first use unless one
    /// was [installed](Selector::install) earlier. Concurrent first callers
    /// share a single initialization; a failed initialization is retried by
    /// the next caller.
    pub async fn global() -> Result<Selector, SwitchyardError> {
        GLOBAL
            .get_or_try_init(|| async {
                let config = switchyard_config::load_and_validate().map_err(|errors| {
                    SwitchyardError::Configuration(
                        errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    )
                })?;
                let selector = Selector::from_config(&config).await?;
                info!(rules = %config.rules.path, "process selector initialized");
                Ok::<_, SwitchyardError>(selector)
            })
            .await
            .cloned()
    }

    /// Make `selector` the process-wide selector.
    ///
    /// Returns it back if a global selector already exists.
    pub fn install(selector: Selector) -> Result<(), Selector> {
        GLOBAL.set(selector).map_err(|e| match e {
            SetError::AlreadyInitializedError(s) | SetError::InitializingError(s) => s,
        })
    }

    pub fn engine(&self) -> &Arc<SelectionEngine> {
        &self.engine
    }

    /// Options applied by [`Selector::choose`]; a starting point for
    /// [`Selector::choose_with`].
    pub fn options(&self) -> ChooseOptions {
        self.defaults.clone()
    }

    /// Choose with the default options.
    pub async fn choose(&self, prompt: &str) -> Result<Decision, SwitchyardError> {
        self.choose_with(prompt, self.options()).await
    }

    pub async fn choose_with(
        &self,
        prompt: &str,
        options: ChooseOptions,
    ) -> Result<Decision, SwitchyardError> {
        self.engine.choose(&options.into_request(prompt)).await
    }
}

/// Model selection as a capability of the implementing type.
///
/// ```ignore
/// struct Summarizer { selector: Selector }
///
/// impl LlmChoice for Summarizer {
///     fn selector(&self) -> &Selector { &self.selector }
/// }
///
/// let decision = summarizer
///     .llm_choice(text, ChooseOptions::default().task_type("summarize"))
///     .await?;
/// ```
#[async_trait]
pub trait LlmChoice: Send + Sync {
    fn selector(&self) -> &Selector;

    async fn llm_choice(
        &self,
        prompt: &str,
        options: ChooseOptions,
    ) -> Result<Decision, SwitchyardError> {
        self.selector().choose_with(prompt, options).await
    }
}
