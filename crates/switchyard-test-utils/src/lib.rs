// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! # Components
//!
//! - [`MockGateway`] - gateway double with scripted costs and failures
//! - [`MemoryRuleSource`] - rule source tests can rewrite or break
//! - [`fixtures`] - sample rule documents and temporary rule files

pub mod fixtures;
pub mod memory_source;
pub mod mock_gateway;

pub use fixtures::{SAMPLE_RULES_YAML, TempRulesFile, sample_rule_table};
pub use memory_source::MemoryRuleSource;
pub use mock_gateway::MockGateway;
