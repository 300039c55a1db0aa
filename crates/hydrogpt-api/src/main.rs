//! HydroGPT API Server
//!
//! Backend for natural-language water accessibility analysis over
//! Mbeere South Subcounty. A missing database or model credential degrades
//! the affected endpoints; it never prevents startup.

use hydrogpt_api::{create_router, state::AppState};
use hydrogpt_core::{AppConfig, SpatialStore};
use hydrogpt_pipeline::create_llm_client;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "hydrogpt_api={level},hydrogpt_pipeline={level},hydrogpt_core={level},tower_http=warn",
                    level = config.logging.level
                ))
            }),
        )
        .init();

    let store = match &config.database.url {
        Some(url) => match SpatialStore::connect(url, config.database.pool_size).await {
            Ok(store) => {
                tracing::info!("database connected");
                Some(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!(error = %e, "database connection failed, data endpoints degraded");
                None
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, data endpoints degraded");
            None
        }
    };

    let llm = match create_llm_client(&config.llm) {
        Ok(Some(client)) => {
            tracing::info!(model = %config.llm.model, "model client configured");
            Some(client)
        }
        Ok(None) => {
            tracing::warn!("ANTHROPIC_API_KEY not set, queries answer with data passthrough");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "model client setup failed, queries answer with data passthrough");
            None
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, store, llm));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HydroGPT API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
