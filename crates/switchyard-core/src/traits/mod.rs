// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the engine and its remote collaborators.

pub mod gateway;

pub use gateway::GatewayApi;
