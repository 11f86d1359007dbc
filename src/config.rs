// ABOUTME: Environment-based configuration for the assist server
// ABOUTME: Reads provider credentials, data store endpoints, and link building settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Server configuration
//!
//! Configuration is environment-only. Provider credentials that are absent at
//! startup do not prevent the server from starting: the stage that needs a
//! missing credential degrades (web search) or fails the request with a
//! configuration error (model provider).

use std::env;

/// Default model identifier when the request does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port (`BAZAAR_HTTP_PORT`)
    pub http_port: u16,
    /// Model provider API key (`BAZAAR_GEMINI_API_KEY`)
    pub gemini_api_key: Option<String>,
    /// Model provider base URL (`BAZAAR_GEMINI_BASE_URL`)
    pub gemini_base_url: String,
    /// Primary web-search provider API key (`BAZAAR_SEARCH_API_KEY`)
    pub search_api_key: Option<String>,
    /// Catalog data store base URL (`BAZAAR_STORE_URL`)
    pub store_url: Option<String>,
    /// Catalog data store privileged access key (`BAZAAR_STORE_SERVICE_KEY`)
    pub store_service_key: Option<String>,
    /// Base path used to build product deep links (`BAZAAR_PRODUCT_LINK_BASE`)
    pub product_link_base: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            http_port: env::var("BAZAAR_HTTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_PORT),
            gemini_api_key: non_empty_var("BAZAAR_GEMINI_API_KEY"),
            gemini_base_url: non_empty_var("BAZAAR_GEMINI_BASE_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_owned()),
            search_api_key: non_empty_var("BAZAAR_SEARCH_API_KEY"),
            store_url: non_empty_var("BAZAAR_STORE_URL"),
            store_service_key: non_empty_var("BAZAAR_STORE_SERVICE_KEY"),
            product_link_base: non_empty_var("BAZAAR_PRODUCT_LINK_BASE")
                .unwrap_or_else(|| "https://bazaar.example.com".to_owned()),
        }
    }
}

/// Read an environment variable, treating blank values as unset
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
