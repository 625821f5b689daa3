// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM gateway client for Switchyard.
//!
//! Implements [`switchyard_core::GatewayApi`] against an OpenAI-compatible
//! gateway that also exposes `/estimate` and `/pricing` endpoints.

pub mod client;
pub mod types;

pub use client::GatewayClient;
