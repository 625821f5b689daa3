// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for model selection.
//!
//! Only [`SwitchyardError::Configuration`] and [`SwitchyardError::InvalidRequest`]
//! ever reach a caller of `choose`. The remaining variants describe degraded
//! dependencies; the engine logs them and carries on.

use std::time::Duration;

use thiserror::Error;

/// The error type shared by every Switchyard crate.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// The rule source is unusable: unparsable on first load, or missing the
    /// `default` rule. Fatal for the engine.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A later rule reload failed. The last good table stays in effect.
    #[error("rule reload from {source_name} failed: {message}")]
    ReloadFailure {
        source_name: String,
        message: String,
    },

    /// The gateway catalog could not be fetched.
    #[error("model catalog unavailable: {message}")]
    CatalogUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The cost estimate for a model could not be obtained.
    #[error("cost estimation degraded for {model}: {message}")]
    EstimationDegraded { model: String, message: String },

    /// The gateway answered with a non-success status or an unreadable body.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A gateway call exceeded its time budget.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The caller passed an unusable selection request.
    #[error("invalid selection request: {0}")]
    InvalidRequest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchyardError {
    /// Whether the error reflects a misconfigured system rather than a
    /// transient dependency failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SwitchyardError::Configuration(_))
    }
}
