// ABOUTME: Request payload validation and normalization for the assist endpoint
// ABOUTME: Produces a typed message list, model name, temperature, and search toggle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Request normalization
//!
//! The inbound payload arrives as arbitrary JSON. Normalization either
//! produces a fully validated [`NormalizedRequest`] or rejects the request
//! with `InvalidInput`; nothing downstream re-validates shapes.

use serde_json::Value;

use crate::config::DEFAULT_MODEL;
use crate::conversation::ConversationMessage;
use crate::errors::{AppError, AppResult};

/// Temperature default when the payload omits it or it cannot be parsed
const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Validated request parameters for one pipeline invocation
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    /// Ordered, non-empty message list
    pub messages: Vec<ConversationMessage>,
    /// Model identifier, defaulted when absent or blank
    pub model: String,
    /// Sampling temperature clamped into [0, 2]
    pub temperature: f64,
    /// Whether web-search evidence gathering is enabled
    pub web_search: bool,
}

/// Validate and normalize an inbound request body
///
/// # Errors
///
/// Returns `InvalidInput` if `messages` is not an array, any entry lacks a
/// non-empty `role` or `content`, or the resulting list is empty.
pub fn normalize_request(body: &Value) -> AppResult<NormalizedRequest> {
    let messages = normalize_messages(body.get("messages"))?;

    let model = body
        .get("model")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL)
        .to_owned();

    let temperature = normalize_temperature(body.get("temperature"));
    let web_search = coerce_bool(body.get("web_search")).unwrap_or(true);

    Ok(NormalizedRequest {
        messages,
        model,
        temperature,
        web_search,
    })
}

/// Validate the message list
fn normalize_messages(value: Option<&Value>) -> AppResult<Vec<ConversationMessage>> {
    let Some(Value::Array(entries)) = value else {
        return Err(AppError::invalid_input("messages must be an array"));
    };

    let mut messages = Vec::with_capacity(entries.len());
    for entry in entries {
        let role = entry
            .get("role")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::invalid_input("every message requires a role"))?;

        let content = entry
            .get("content")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::invalid_input("every message requires content"))?;

        let images = entry
            .get("images")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        messages.push(ConversationMessage {
            role: role.to_owned(),
            text: content.to_owned(),
            images,
        });
    }

    if messages.is_empty() {
        return Err(AppError::invalid_input("messages must not be empty"));
    }

    Ok(messages)
}

/// Clamp the temperature into [0, 2], accepting numbers or numeric strings
fn normalize_temperature(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed
        .filter(|t: &f64| t.is_finite())
        .map_or(DEFAULT_TEMPERATURE, |t| t.clamp(0.0, 2.0))
}

/// Coerce a boolean-like value: real booleans plus common string forms
fn coerce_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
