// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local prompt token counting for the pricing estimator.

use std::sync::Arc;

use dashmap::DashMap;
use switchyard_core::SwitchyardError;
use tiktoken_rs::CoreBPE;
use tiktoken_rs::tokenizer::{Tokenizer, get_tokenizer};
use tracing::debug;

/// Counts prompt tokens with the model's BPE.
///
/// Encoders are cached per encoding, not per model name, so the cache holds
/// at most one entry per tiktoken encoding no matter which model names
/// callers send. Models tiktoken does not know are counted with `cl100k_base`.
#[derive(Default)]
pub struct TokenCounter {
    encoders: DashMap<Tokenizer, Arc<CoreBPE>>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, model: &str, text: &str) -> Result<usize, SwitchyardError> {
        let encoder = self.encoder(model)?;
        Ok(encoder.encode_with_special_tokens(text).len())
    }

    fn encoder(&self, model: &str) -> Result<Arc<CoreBPE>, SwitchyardError> {
        let tokenizer = get_tokenizer(model).unwrap_or_else(|| {
            debug!(model, "no tokenizer registered for model, using cl100k_base");
            Tokenizer::Cl100kBase
        });
        if let Some(encoder) = self.encoders.get(&tokenizer) {
            return Ok(Arc::clone(encoder.value()));
        }

        let entry = self.encoders.entry(tokenizer).or_try_insert_with(|| {
            tiktoken_rs::get_bpe_from_tokenizer(tokenizer)
                .map(Arc::new)
                .map_err(|e| {
                    SwitchyardError::Internal(format!("failed to load {tokenizer:?} encoding: {e}"))
                })
        })?;
        Ok(Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_known_model_tokens() {
        let counter = TokenCounter::new();
        let n = counter.count("gpt-4", "hello world").unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn unknown_model_uses_fallback_encoding() {
        let counter = TokenCounter::new();
        let known = counter.count("gpt-4", "The quick brown fox").unwrap();
        let unknown = counter.count("acme-llm-7b", "The quick brown fox").unwrap();
        assert_eq!(known, unknown);
    }

    #[test]
    fn models_sharing_an_encoding_share_an_encoder() {
        let counter = TokenCounter::new();
        counter.count("gpt-4", "a").unwrap();
        counter.count("gpt-4", "b").unwrap();
        counter.count("gpt-3.5-turbo", "c").unwrap();
        assert_eq!(counter.encoders.len(), 1);
    }

    #[test]
    fn unknown_model_names_do_not_grow_the_cache() {
        let counter = TokenCounter::new();
        for i in 0..20 {
            counter.count(&format!("acme-llm-{i}"), "hello").unwrap();
        }
        assert_eq!(counter.encoders.len(), 1);
        assert!(counter.encoders.contains_key(&Tokenizer::Cl100kBase));
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert_eq!(TokenCounter::new().count("gpt-4", "").unwrap(), 0);
    }
}
