// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision facade: shared selectors and the `LlmChoice` capability.

use std::sync::Arc;
use std::time::Duration;

use switchyard_config::EstimatorStrategy;
use switchyard_engine::{ChooseOptions, LlmChoice, SelectionEngine, Selector};
use switchyard_rules::RuleStore;
use switchyard_test_utils::{MemoryRuleSource, MockGateway, sample_rule_table};

async fn selector(gateway: &Arc<MockGateway>) -> Selector {
    let source = Arc::new(MemoryRuleSource::new(sample_rule_table()));
    let rules = RuleStore::open(source, Duration::from_secs(60)).await.unwrap();
    let engine = SelectionEngine::new(
        rules,
        gateway.clone(),
        EstimatorStrategy::Remote,
        Duration::from_secs(1),
    );
    Selector::new(Arc::new(engine))
}

struct Summarizer {
    selector: Selector,
}

impl LlmChoice for Summarizer {
    fn selector(&self) -> &Selector {
        &self.selector
    }
}

#[tokio::test]
async fn choose_uses_named_defaults() {
    let gateway = Arc::new(MockGateway::new());
    let selector = selector(&gateway).await;

    let decision = selector.choose("hello").await.unwrap();
    assert_eq!(decision.model, "gpt-3.5-turbo");
    assert_eq!(decision.max_tokens, 1024);
}

#[tokio::test]
async fn llm_choice_forwards_options() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_estimate("gpt-4", 0.05)
            .with_estimate("gpt-3.5-turbo", 0.002),
    );
    let summarizer = Summarizer {
        selector: selector(&gateway).await,
    };

    let cheap = summarizer
        .llm_choice(
            "long text",
            ChooseOptions::default()
                .task_type("summarize")
                .max_cost_usd(0.01),
        )
        .await
        .unwrap();
    assert_eq!(cheap.model, "gpt-3.5-turbo");

    let generous = summarizer
        .llm_choice("long text", ChooseOptions::default().task_type("summarize"))
        .await
        .unwrap();
    assert_eq!(generous.model, "gpt-4");
}

#[tokio::test]
async fn cloned_selectors_share_one_engine() {
    let gateway = Arc::new(MockGateway::new().with_models(&["gpt-4"]));
    let selector = selector(&gateway).await;
    let callers: Vec<Selector> = (0..4).map(|_| selector.clone()).collect();

    for caller in &callers {
        caller.choose("x").await.unwrap();
        assert!(Arc::ptr_eq(caller.engine(), selector.engine()));
    }
    assert_eq!(gateway.catalog_calls(), 1);
}

#[tokio::test]
async fn custom_defaults_apply_to_choose() {
    let gateway = Arc::new(MockGateway::new());
    let selector = selector(&gateway)
        .await
        .with_defaults(ChooseOptions::default().task_type("summarize"));

    assert_eq!(selector.options().task_type, "summarize");
    assert_eq!(selector.choose("x").await.unwrap().model, "gpt-4");
}

#[tokio::test]
async fn installed_selector_is_the_global_one() {
    let gateway = Arc::new(MockGateway::new());
    let installed = selector(&gateway).await;
    Selector::install(installed.clone()).unwrap();

    let global = Selector::global().await.unwrap();
    assert!(Arc::ptr_eq(global.engine(), installed.engine()));

    let again = selector(&gateway).await;
    assert!(Selector::install(again).is_err());
}

#[tokio::test]
async fn empty_prompt_is_rejected() {
    let gateway = Arc::new(MockGateway::new());
    let selector = selector(&gateway).await;
    assert!(selector.choose("  ").await.is_err());
}
