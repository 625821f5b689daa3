// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model selection engine for Switchyard.
//!
//! Data flow: [`Selector`] → [`SelectionEngine`] → rule store, [`CatalogCache`]
//! and [`CostEstimator`] → gateway.

pub mod catalog;
pub mod engine;
pub mod estimator;
pub mod facade;
pub mod tokens;

pub use catalog::CatalogCache;
pub use engine::SelectionEngine;
pub use estimator::CostEstimator;
pub use facade::{ChooseOptions, LlmChoice, Selector};
pub use tokens::TokenCounter;
