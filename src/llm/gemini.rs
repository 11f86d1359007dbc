// ABOUTME: Gemini generateContent client implementing the model provider trait
// ABOUTME: Serializes multimodal turns and surfaces provider failures with their message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Gemini client
//!
//! Posts the assembled request to the `generateContent` endpoint and returns
//! the provider's JSON payload untouched; the route layer attaches pipeline
//! metadata on top. A missing API key fails the request with a configuration
//! error at call time rather than preventing server startup.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::llm::{GenerationRequest, ModelProvider, Part};

/// Message used when the provider fails without a usable error body
const DEFAULT_FAILURE_MESSAGE: &str = "Model provider request failed";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct WireRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireTurn>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(Serialize)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Serialize)]
struct WireTurn {
    role: &'static str,
    parts: Vec<WirePart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart {
    Text {
        text: String,
    },
    Inline {
        inline_data: WireInlineData,
    },
}

#[derive(Serialize)]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct WireGenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct WireErrorBody {
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: Option<String>,
}

impl GeminiClient {
    /// Create a client; the API key may be absent and is checked per call
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn to_wire(request: &GenerationRequest) -> WireRequest {
        WireRequest {
            system_instruction: request.system_instruction.as_ref().map(|text| WireContent {
                parts: vec![WirePart::Text { text: text.clone() }],
            }),
            contents: request
                .turns
                .iter()
                .map(|turn| WireTurn {
                    role: turn.role.label(),
                    parts: turn.parts.iter().map(wire_part).collect(),
                })
                .collect(),
            generation_config: WireGenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

fn wire_part(part: &Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart::Text { text: text.clone() },
        Part::InlineData { mime_type, data } => WirePart::Inline {
            inline_data: WireInlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            },
        },
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("BAZAAR_GEMINI_API_KEY is not set"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::to_wire(request))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::generation_failed(format!("model call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<WireErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_owned());
            return Err(AppError::generation_failed(message));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::generation_failed(format!("model response parse failed: {e}")))
    }
}
