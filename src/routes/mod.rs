// ABOUTME: Route module organization for the assist server HTTP endpoints
// ABOUTME: Centralizes route definitions with thin handlers delegating to the pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Route module for the assist server
//!
//! Each domain module contains route definitions and thin handler functions
//! that delegate to the pipeline and service layers.

/// AI shopping assistant endpoint
pub mod assist;

/// Health check and system status routes
pub mod health;

pub use assist::AssistRoutes;
pub use health::HealthRoutes;
