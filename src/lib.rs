// ABOUTME: Main library entry point for the Bazaar AI shopping assistant backend
// ABOUTME: Provides the context-augmentation pipeline behind the storefront assist endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

#![deny(unsafe_code)]

//! # Bazaar Assist Server
//!
//! Backend request handler powering the Bazaar storefront's AI shopping
//! assistant. Given a conversation, the server authenticates the caller,
//! optionally gathers web-search evidence with provider fallback, optionally
//! retrieves and ranks matching catalog products with live stock computation,
//! injects the gathered evidence into the conversation, and assembles a
//! multimodal request to the LLM provider.
//!
//! ## Architecture
//!
//! Each request is handled by an independent, stateless invocation. Pipeline
//! stages run sequentially:
//!
//! 1. **Access guard** - decodes the bearer credential into a caller identity
//! 2. **Request normalizer** - validates the payload into typed messages
//! 3. **Web search** - primary API provider with an HTML-scrape fallback
//! 4. **Catalog context** - term extraction, candidate ranking, stock math
//! 5. **Context injection** - evidence turns spliced into the conversation
//! 6. **Model request** - multimodal `generateContent` call
//! 7. **Response assembly** - provider payload plus search metadata
//!
//! All external collaborators (search providers, catalog store, model
//! provider) sit behind traits so the pipeline is deterministic under test.

/// Bearer credential decoding and caller identity extraction
pub mod auth;

/// Catalog evidence: trigger decision, term extraction, ranking, formatting
pub mod catalog;

/// Environment-based server configuration
pub mod config;

/// Conversation turns and evidence injection
pub mod conversation;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// LLM provider abstraction and the Gemini client
pub mod llm;

/// Production logging setup
pub mod logging;

/// Request payload validation and normalization
pub mod normalize;

/// The assist pipeline orchestrating all stages of one request
pub mod pipeline;

/// Shared per-process resources handed to route handlers
pub mod resources;

/// HTTP routes for the assist endpoint and health checks
pub mod routes;

/// Web search providers and the ordered fallback chain
pub mod search;

/// Catalog data store client (PostgREST-style query interface)
pub mod store;
