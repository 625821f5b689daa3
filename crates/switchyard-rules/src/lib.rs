// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule tables for Switchyard.
//!
//! A rule maps a task type to a primary model, an optional cheaper fallback,
//! and sampling parameters. [`RuleStore`] keeps the current table behind an
//! atomic snapshot and re-reads its [`RuleSource`] lazily once the refresh
//! interval has passed.

pub mod rule;
pub mod source;
pub mod store;

pub use rule::{Rule, RuleFormat, RuleTable};
pub use source::{FileRuleSource, RuleSource};
pub use store::{DEFAULT_REFRESH_INTERVAL, RuleStore};
