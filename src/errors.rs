// ABOUTME: Unified error handling for the assist pipeline with standard error codes
// ABOUTME: Maps pipeline failures to HTTP status codes and JSON error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Unified error handling
//!
//! Four caller-visible failure classes exist: bad credentials (401), malformed
//! input (400), missing provider configuration (500), and model provider
//! failures (500). Everything else - search provider outages, catalog query
//! failures, enrichment gaps - is recovered inside the pipeline and degrades
//! to "no evidence" rather than reaching the caller.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Error classification carried by every [`AppError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad, missing, or malformed credential, or wrong role claim
    Unauthorized,
    /// Malformed message list or wrong payload shapes
    InvalidInput,
    /// A required provider credential or setting is absent
    MissingConfiguration,
    /// The model provider returned a non-success response
    GenerationFailed,
    /// Unexpected internal failure
    Internal,
}

impl ErrorCode {
    /// HTTP status code for this error class
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::MissingConfiguration | Self::GenerationFailed | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Application error with a classification and a caller-facing message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message returned to the caller
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Authentication failure (401)
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Malformed request payload (400)
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required configuration (500)
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingConfiguration, message)
    }

    /// Model provider returned a non-success response (500)
    #[must_use]
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Unexpected internal failure (500)
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(
            AppError::auth_invalid("x").code.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::invalid_input("x").code.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::config("x").code.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::generation_failed("x").code.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_is_displayed() {
        let err = AppError::invalid_input("messages must be a non-empty array");
        assert_eq!(err.to_string(), "messages must be a non-empty array");
    }
}
