//! HydroGPT Pipeline - context assembly and response normalization
//!
//! The core request flow: build a textual data digest from current database
//! state, concatenate it with the static instruction template and the user
//! query, submit the payload to the external model, and coerce whatever
//! comes back into the envelope contract. Every degradation path (no
//! database, no credential, model fault, malformed reply) ends in a valid
//! 2xx envelope.

use chrono::Utc;
use hydrogpt_core::{LlmClient, SpatialStore};
use serde_json::Value;
use std::sync::Arc;

pub mod digest;
pub mod llm;
pub mod normalize;
pub mod prompt;

pub use llm::{create_llm_client, AnthropicClient};
pub use normalize::ModelReply;

/// Query processing pipeline
///
/// Holds the long-lived shared handles: both are established once at process
/// start and never mutated afterwards. Either may be absent; the pipeline
/// degrades per-call instead of failing.
pub struct QueryPipeline {
    store: Option<Arc<SpatialStore>>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl QueryPipeline {
    pub fn new(store: Option<Arc<SpatialStore>>, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { store, llm }
    }

    /// Process a user query into a response envelope. Infallible: model and
    /// database faults are reported inside the envelope.
    pub async fn process(&self, query: &str) -> Value {
        let digest = self.build_digest().await;

        let Some(client) = &self.llm else {
            tracing::debug!("model client not configured, returning data passthrough");
            return normalize::raw_envelope(
                format!(
                    "HydroGPT received your query: '{query}'. Model client not configured, \
                     but I can see your data context: {digest}"
                ),
                Utc::now(),
            );
        };

        let payload = prompt::assemble(&digest, query);
        tracing::info!(prompt_chars = payload.len(), "submitting query to model");

        match client.complete(&payload).await {
            Ok(reply) => {
                tracing::info!(reply_chars = reply.len(), "model reply received");
                ModelReply::parse(&reply).into_envelope(Utc::now())
            }
            Err(e) => {
                tracing::warn!(error = %e, "model call failed, degrading to error envelope");
                normalize::raw_envelope(
                    format!("Error processing query with model API: {e}"),
                    Utc::now(),
                )
            }
        }
    }

    /// Build the data digest from current database state. Data-access faults
    /// degrade to a short inline string.
    pub async fn build_digest(&self) -> String {
        let Some(store) = &self.store else {
            return "Database not connected".to_string();
        };

        match tokio::try_join!(store.fetch_area_statistics(), store.fetch_summary()) {
            Ok((areas, summary)) => digest::build_digest(&areas, &summary),
            Err(e) => {
                tracing::warn!(error = %e, "digest query failed");
                format!("Error getting context: {e}")
            }
        }
    }
}
