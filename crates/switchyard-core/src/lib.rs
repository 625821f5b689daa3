// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Switchyard, the rule-driven LLM model selector.
//!
//! This crate holds the error taxonomy, the value types exchanged between
//! the engine and its callers, and the [`GatewayApi`] trait implemented by
//! the HTTP gateway client and by test doubles.

pub mod error;
pub mod traits;
pub mod types;

pub use error::SwitchyardError;
pub use traits::GatewayApi;
pub use types::{
    CostEstimate, DEFAULT_TASK_TYPE, Decision, ModelCatalog, ModelDescriptor, SelectionRequest,
};
