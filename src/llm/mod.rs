// ABOUTME: Model provider abstraction and multimodal request building
// ABOUTME: Splits system instructions from turns and expands images into inline parts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Model request building
//!
//! The conversation (including injected evidence turns) is converted into a
//! provider request: system-role messages concatenate into one instruction,
//! every other turn becomes a multi-part payload of text plus inline image
//! data decoded from data URIs. The provider itself sits behind
//! [`ModelProvider`] so the pipeline can be exercised without network access.

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::conversation::{Conversation, Turn};
use crate::errors::AppResult;

pub use gemini::GeminiClient;

/// Role of a provider-facing turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// Caller-authored content
    User,
    /// Assistant/model-authored content
    Model,
}

impl TurnRole {
    /// Wire label for the role
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One content part of a provider turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Plain text
    Text(String),
    /// Inline binary payload with a declared mime type
    InlineData {
        /// Declared mime type, e.g. `image/png`
        mime_type: String,
        /// Base64 payload as carried by the data URI
        data: String,
    },
}

/// A provider-facing conversational turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTurn {
    /// Turn role
    pub role: TurnRole,
    /// Ordered content parts: text first, then one part per image
    pub parts: Vec<Part>,
}

/// A fully assembled model request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Concatenated system instruction, absent when no system messages exist
    pub system_instruction: Option<String>,
    /// Conversational turns in order
    pub turns: Vec<GenerationTurn>,
}

/// A large-language-model provider
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Issue the generation call, returning the provider's raw JSON payload
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Value>;
}

/// Build the provider request from a conversation
///
/// System-role messages concatenate in order, double-newline separated and
/// trimmed. Remaining turns keep "user" as user; anything else (assistant
/// turns) maps to the model role. Evidence turns read as user context.
#[must_use]
pub fn build_generation_request(
    conversation: &Conversation,
    model: &str,
    temperature: f64,
) -> GenerationRequest {
    let mut system_sections: Vec<&str> = Vec::new();
    let mut turns = Vec::new();

    for turn in conversation.turns() {
        match turn {
            Turn::Message(message) if message.is_system() => {
                system_sections.push(message.text.as_str());
            }
            Turn::Message(message) => {
                let role = if message.is_user() {
                    TurnRole::User
                } else {
                    TurnRole::Model
                };
                let mut parts = vec![Part::Text(message.text.clone())];
                for image in &message.images {
                    if let Some((mime_type, data)) = parse_data_uri(image) {
                        parts.push(Part::InlineData { mime_type, data });
                    }
                }
                turns.push(GenerationTurn { role, parts });
            }
            Turn::Evidence(text) => {
                turns.push(GenerationTurn {
                    role: TurnRole::User,
                    parts: vec![Part::Text(text.clone())],
                });
            }
        }
    }

    let system_instruction = {
        let joined = system_sections.join("\n\n");
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    };

    GenerationRequest {
        model: model.to_owned(),
        temperature,
        system_instruction,
        turns,
    }
}

/// Split a data URI into its declared mime type and base64 payload
///
/// Returns `None` for anything that is not a base64 data URI; callers skip
/// such references rather than failing the request.
#[must_use]
pub fn parse_data_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    if mime_type.is_empty() || payload.is_empty() {
        return None;
    }
    Some((mime_type.to_owned(), payload.to_owned()))
}
