// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behavioural properties of the selection engine.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use switchyard_config::EstimatorStrategy;
use switchyard_core::{Decision, SelectionRequest, SwitchyardError};
use switchyard_engine::SelectionEngine;
use switchyard_rules::RuleStore;
use switchyard_test_utils::fixtures::parse_yaml;
use switchyard_test_utils::{MemoryRuleSource, MockGateway, TempRulesFile, sample_rule_table};
use tracing_test::traced_test;

async fn engine_with(gateway: &Arc<MockGateway>, refresh: Duration) -> SelectionEngine {
    let source = Arc::new(MemoryRuleSource::new(sample_rule_table()));
    let rules = RuleStore::open(source, refresh).await.unwrap();
    SelectionEngine::new(
        rules,
        gateway.clone(),
        EstimatorStrategy::Remote,
        Duration::from_millis(200),
    )
}

async fn engine(gateway: &Arc<MockGateway>) -> SelectionEngine {
    engine_with(gateway, Duration::from_secs(60)).await
}

#[tokio::test]
async fn summarize_over_budget_falls_back() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_estimate("gpt-4", 0.05)
            .with_estimate("gpt-3.5-turbo", 0.002),
    );
    let engine = engine(&gateway).await;

    let decision = engine
        .choose(
            &SelectionRequest::new("x")
                .task_type("summarize")
                .max_cost_usd(0.01),
        )
        .await
        .unwrap();

    assert_eq!(decision.model, "gpt-3.5-turbo");
    assert_eq!(decision.max_tokens, 512);
    assert!((decision.temperature - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn within_budget_keeps_primary() {
    let gateway = Arc::new(MockGateway::new().with_estimate("gpt-4", 0.05));
    let engine = engine(&gateway).await;

    let decision = engine
        .choose(&SelectionRequest::new("x").task_type("summarize"))
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4");
    assert_eq!(gateway.estimate_calls(), 1);
}

#[tokio::test]
async fn unknown_task_type_behaves_like_default() {
    let gateway = Arc::new(MockGateway::new().with_estimate("gpt-3.5-turbo", 0.001));
    let engine = engine(&gateway).await;

    let unknown = engine
        .choose(&SelectionRequest::new("x").task_type("translate"))
        .await
        .unwrap();
    let default = engine.choose(&SelectionRequest::new("x")).await.unwrap();
    assert_eq!(unknown, default);
}

#[tokio::test]
async fn repeated_calls_are_idempotent() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_estimate("gpt-4", 0.05)
            .with_estimate("gpt-3.5-turbo", 0.002),
    );
    let engine = engine(&gateway).await;
    let request = SelectionRequest::new("x")
        .task_type("summarize")
        .max_cost_usd(0.01);

    let first = engine.choose(&request).await.unwrap();
    for _ in 0..5 {
        assert_eq!(engine.choose(&request).await.unwrap(), first);
    }
}

#[tokio::test]
#[traced_test]
async fn estimator_errors_select_primary() {
    let gateway = Arc::new(MockGateway::new().with_estimate("gpt-4", 10.0));
    gateway.fail_estimates(true);
    let engine = engine(&gateway).await;

    let decision = engine
        .choose(
            &SelectionRequest::new("x")
                .task_type("summarize")
                .max_cost_usd(0.01),
        )
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4");
    assert!(logs_contain("assuming zero cost"));
}

#[tokio::test]
async fn estimator_timeouts_select_primary() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_estimate("gpt-4", 10.0)
            .with_delay(Duration::from_secs(2)),
    );
    let engine = engine(&gateway).await;

    let started = std::time::Instant::now();
    let decision = engine
        .choose(
            &SelectionRequest::new("x")
                .task_type("summarize")
                .max_cost_usd(0.01),
        )
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4");
    // Catalog fetch and estimate are each cut off at the 200 ms gateway timeout.
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn catalog_outage_does_not_fail_selection() {
    let gateway = Arc::new(MockGateway::new());
    gateway.fail_catalog(true);
    let engine = engine(&gateway).await;

    let decision = engine
        .choose(&SelectionRequest::new("x").task_type("summarize"))
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4");
}

#[tokio::test]
async fn slow_catalog_costs_each_caller_at_most_one_timeout() {
    let gateway = Arc::new(MockGateway::new().with_delay(Duration::from_millis(500)));
    let engine = Arc::new(engine(&gateway).await);

    let calls = (0..10).map(|_| {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let started = std::time::Instant::now();
            let decision = engine.choose(&SelectionRequest::new("x")).await;
            (decision, started.elapsed())
        })
    });
    let mut slowest = Duration::ZERO;
    for result in futures::future::join_all(calls).await {
        let (decision, elapsed) = result.unwrap();
        assert_eq!(decision.unwrap().model, "gpt-3.5-turbo");
        slowest = slowest.max(elapsed);
    }

    // One 200 ms catalog timeout plus one 200 ms estimate timeout.
    assert!(slowest < Duration::from_millis(900), "slowest caller took {slowest:?}");
    assert_eq!(engine.catalog().fetch_count(), 1);
}

#[tokio::test]
async fn models_missing_from_catalog_are_still_selected() {
    let gateway = Arc::new(MockGateway::new().with_models(&["claude-3-haiku"]));
    let engine = engine(&gateway).await;

    let decision = engine.choose(&SelectionRequest::new("x")).await.unwrap();
    assert_eq!(decision.model, "gpt-3.5-turbo");
}

#[tokio::test]
async fn catalog_is_fetched_once_across_concurrent_calls() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_models(&["gpt-4", "gpt-3.5-turbo"])
            .with_delay(Duration::from_millis(20)),
    );
    let engine = Arc::new(engine(&gateway).await);

    let calls = (0..32).map(|i| {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let task = if i % 2 == 0 { "summarize" } else { "default" };
            engine
                .choose(&SelectionRequest::new("x").task_type(task))
                .await
        })
    });
    for result in futures::future::join_all(calls).await {
        result.unwrap().unwrap();
    }

    assert_eq!(gateway.catalog_calls(), 1);
    assert_eq!(engine.catalog().fetch_count(), 1);
}

#[tokio::test]
async fn rule_edits_apply_only_after_refresh_interval() {
    let file = TempRulesFile::new(switchyard_test_utils::SAMPLE_RULES_YAML);
    let gateway = Arc::new(MockGateway::new());
    let rules = RuleStore::from_path(file.path(), Duration::from_millis(100))
        .await
        .unwrap();
    let engine = SelectionEngine::new(
        rules,
        gateway.clone(),
        EstimatorStrategy::Remote,
        Duration::from_millis(200),
    );
    let request = SelectionRequest::new("x").task_type("summarize");

    file.rewrite("default:\n  model: gpt-3.5-turbo\nsummarize:\n  model: claude-3-opus\n");
    assert_eq!(engine.choose(&request).await.unwrap().model, "gpt-4");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(engine.choose(&request).await.unwrap().model, "claude-3-opus");
}

#[tokio::test]
async fn broken_reload_keeps_serving_decisions() {
    let source = Arc::new(MemoryRuleSource::new(sample_rule_table()));
    let rules = RuleStore::open(source.clone(), Duration::from_millis(20))
        .await
        .unwrap();
    let gateway = Arc::new(MockGateway::new());
    let engine = SelectionEngine::new(
        rules,
        gateway.clone(),
        EstimatorStrategy::Remote,
        Duration::from_millis(200),
    );

    source.break_with("rules file truncated").await;
    tokio::time::sleep(Duration::from_millis(60)).await;

    let decision = engine
        .choose(&SelectionRequest::new("x").task_type("summarize"))
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4");
    assert!(
        engine
            .rules()
            .last_reload_error()
            .unwrap()
            .contains("truncated")
    );

    source
        .set(parse_yaml("default:\n  model: gpt-4o-mini\n"))
        .await;
    engine.rules().reload_now().await.unwrap();
    let decision = engine
        .choose(&SelectionRequest::new("x").task_type("summarize"))
        .await
        .unwrap();
    assert_eq!(decision.model, "gpt-4o-mini");
}

#[tokio::test]
async fn rule_store_without_default_is_fatal() {
    let file = TempRulesFile::new("summarize:\n  model: gpt-4\n");
    let err = RuleStore::from_path(file.path(), Duration::from_secs(10))
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchyardError::Configuration(_)));
}

fn choose_blocking(primary_cost: f64, fallback_cost: f64, max_cost: f64) -> Decision {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let gateway = Arc::new(
            MockGateway::new()
                .with_estimate("gpt-4", primary_cost)
                .with_estimate("gpt-3.5-turbo", fallback_cost),
        );
        let engine = engine(&gateway).await;
        engine
            .choose(
                &SelectionRequest::new("x")
                    .task_type("summarize")
                    .max_cost_usd(max_cost),
            )
            .await
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fallback_depends_only_on_primary_cost(
        primary in 0.0f64..1.0,
        fallback in 0.0f64..1.0,
        max_cost in 0.0f64..1.0,
    ) {
        let decision = choose_blocking(primary, fallback, max_cost);
        let expected = if primary > max_cost { "gpt-3.5-turbo" } else { "gpt-4" };
        prop_assert_eq!(decision.model.as_str(), expected);
        prop_assert_eq!(decision.max_tokens, 512);
    }
}
