// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.

use metrics::{describe_counter, describe_histogram};

/// Describe every Switchyard metric. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "switchyard_decisions_total",
        "Selection decisions returned, by chosen model"
    );
    describe_counter!(
        "switchyard_fallback_total",
        "Selections that switched to the fallback model, by rule"
    );
    describe_counter!(
        "switchyard_estimate_degraded_total",
        "Cost estimates replaced with zero after a gateway failure"
    );
    describe_counter!(
        "switchyard_rule_reloads_total",
        "Successful rule table reloads"
    );
    describe_counter!(
        "switchyard_rule_reload_failures_total",
        "Failed rule table reloads"
    );
    describe_counter!(
        "switchyard_http_requests_total",
        "HTTP requests served, by route and status"
    );
    describe_histogram!(
        "switchyard_selection_latency_seconds",
        "Time to produce a selection decision in seconds"
    );
}

/// Record a served HTTP request.
pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "switchyard_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record how long a selection took.
pub fn record_selection_latency(seconds: f64) {
    metrics::histogram!("switchyard_selection_latency_seconds").record(seconds);
}
