//! Application state
//!
//! Long-lived shared handles, constructed once at process start and passed
//! into every handler behind an `Arc`. Nothing here mutates after startup.

use hydrogpt_core::{AppConfig, LlmClient, SpatialStore};
use hydrogpt_pipeline::QueryPipeline;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Spatial database store; absent when the database is unconfigured or
    /// unreachable at startup
    store: Option<Arc<SpatialStore>>,
    /// Whether a model client was configured
    llm_configured: bool,
    /// Query processing pipeline
    pub pipeline: QueryPipeline,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Option<Arc<SpatialStore>>,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let llm_configured = llm.is_some();
        let pipeline = QueryPipeline::new(store.clone(), llm);
        Self {
            config,
            store,
            llm_configured,
            pipeline,
        }
    }

    pub fn store(&self) -> Option<&Arc<SpatialStore>> {
        self.store.as_ref()
    }

    pub fn database_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn llm_configured(&self) -> bool {
        self.llm_configured
    }
}
