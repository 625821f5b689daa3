// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway request and response bodies.

use serde::{Deserialize, Serialize};
use switchyard_core::ModelDescriptor;

/// `GET /v1/models` response, OpenAI-compatible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub data: Vec<ModelDescriptor>,
}

/// `POST /estimate` request body.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
}

/// `POST /estimate` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateResponse {
    pub estimated_cost: f64,
    #[serde(default)]
    pub tokens: Option<u64>,
}

/// `POST /pricing` request body.
#[derive(Debug, Clone, Serialize)]
pub struct PricingRequest<'a> {
    pub model: &'a str,
}

/// `POST /pricing` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingResponse {
    pub price_per_1k: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_list_keeps_descriptor_metadata() {
        let body = r#"{"object":"list","data":[{"id":"gpt-4","owned_by":"openai"},{"id":"gpt-3.5-turbo"}]}"#;
        let list: ModelListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].metadata["owned_by"], "openai");
    }

    #[test]
    fn estimate_request_shape() {
        let body = serde_json::to_value(EstimateRequest {
            prompt: "hi",
            model: "gpt-4",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"prompt": "hi", "model": "gpt-4"}));
    }

    #[test]
    fn estimate_response_without_tokens() {
        let r: EstimateResponse = serde_json::from_str(r#"{"estimated_cost": 0.002}"#).unwrap();
        assert_eq!(r.tokens, None);
    }

    #[test]
    fn estimate_response_requires_cost() {
        assert!(serde_json::from_str::<EstimateResponse>(r#"{"tokens": 12}"#).is_err());
    }
}
