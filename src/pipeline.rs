// ABOUTME: The assist pipeline orchestrating evidence gathering and the model call
// ABOUTME: Assembles the provider payload with web-search usage metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Assist pipeline
//!
//! One stateless invocation per request: gather web-search evidence (when
//! enabled), gather catalog evidence (when the query warrants it), inject
//! both into the conversation, call the model provider, and attach pipeline
//! metadata to the provider's payload. Evidence failures degrade silently;
//! only the model call can fail the request at this point.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::info;

use crate::catalog::CatalogContextBuilder;
use crate::conversation::Conversation;
use crate::errors::AppResult;
use crate::llm::{build_generation_request, ModelProvider};
use crate::normalize::NormalizedRequest;
use crate::search::{format_search_evidence, SearchChain, WebSearchOutcome};

/// Stateless request pipeline with injected collaborators
pub struct AssistPipeline {
    search: SearchChain,
    catalog: CatalogContextBuilder,
    model: Arc<dyn ModelProvider>,
}

impl AssistPipeline {
    /// Create a pipeline over the given collaborators
    #[must_use]
    pub fn new(
        search: SearchChain,
        catalog: CatalogContextBuilder,
        model: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            search,
            catalog,
            model,
        }
    }

    /// Run the full pipeline for one normalized request
    ///
    /// # Errors
    ///
    /// Returns an error only for missing model configuration or a failed
    /// model call; evidence gathering never fails the request.
    pub async fn handle(&self, request: NormalizedRequest) -> AppResult<Value> {
        let start = Instant::now();

        let mut conversation = Conversation::from_messages(request.messages);
        let query = conversation
            .last_user_text()
            .unwrap_or_default()
            .to_owned();

        let search_outcome = if request.web_search {
            self.search.search(&query).await
        } else {
            WebSearchOutcome::none()
        };
        if search_outcome.used() {
            conversation.inject_evidence(&format_search_evidence(&query, &search_outcome.hits));
        }

        if let Some(block) = self.catalog.build_evidence(&query).await {
            conversation.inject_evidence(&block);
        }

        let generation =
            build_generation_request(&conversation, &request.model, request.temperature);
        let mut payload = self.model.generate(&generation).await?;

        attach_search_metadata(&mut payload, request.web_search, &search_outcome);

        info!(
            model = %request.model,
            web_search = request.web_search,
            search_tier = search_outcome.tier.label(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "assist request completed"
        );
        Ok(payload)
    }
}

/// Attach the `__web_search` metadata object to the provider payload
///
/// The provider's own fields are never altered.
fn attach_search_metadata(payload: &mut Value, enabled: bool, outcome: &WebSearchOutcome) {
    if let Value::Object(map) = payload {
        map.insert(
            "__web_search".to_owned(),
            json!({
                "enabled": enabled,
                "used": outcome.used(),
                "provider": outcome.tier.label(),
                "results_count": outcome.hits.len(),
            }),
        );
    }
}
