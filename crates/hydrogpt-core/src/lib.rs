//! HydroGPT Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions used throughout the HydroGPT service:
//! - Accessibility classification policy
//! - Query request and area statistics models
//! - Common error types
//! - The `LlmClient` trait for external completion providers
//! - Configuration management
//! - Spatial data store (PostgreSQL/PostGIS)

pub mod config;
pub mod geo;
pub mod store;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LlmConfig, ServerConfig};
pub use geo::{Feature, FeatureCollection};
pub use store::SpatialStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for HydroGPT operations
#[derive(Error, Debug)]
pub enum HydroError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HydroError>;

// ============================================================================
// Accessibility Classification
// ============================================================================

/// Accessibility category derived from a score by fixed thresholds.
///
/// The labels are part of the service contract: they appear in the data
/// digest sent to the model, in the model's expected vocabulary, and in the
/// map-data properties consumed by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessibilityCategory {
    VeryWeak,
    Weak,
    Good,
    VeryGood,
    Unknown,
}

impl AccessibilityCategory {
    /// All categories in ascending accessibility order, `Unknown` last.
    pub const ALL: [Self; 5] = [
        Self::VeryWeak,
        Self::Weak,
        Self::Good,
        Self::VeryGood,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for AccessibilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an accessibility score.
///
/// Boundary values belong to the upper bucket: 1.0 is Weak, 1.2 is Good,
/// 1.5 is Very Good. An absent score classifies as Unknown.
pub fn classify(score: Option<f64>) -> AccessibilityCategory {
    match score {
        None => AccessibilityCategory::Unknown,
        Some(x) if x < 1.0 => AccessibilityCategory::VeryWeak,
        Some(x) if x < 1.2 => AccessibilityCategory::Weak,
        Some(x) if x < 1.5 => AccessibilityCategory::Good,
        Some(_) => AccessibilityCategory::VeryGood,
    }
}

// ============================================================================
// Request Models
// ============================================================================

/// Natural-language query request body
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// User's question
    pub query: String,
    /// Caller identity (unused beyond logging)
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

// ============================================================================
// Area Statistics
// ============================================================================

/// Per-area accessibility record read from the statistics table
#[derive(Debug, Clone)]
pub struct AreaStats {
    /// Sublocation name
    pub name: String,
    /// Precomputed accessibility score, absent when the area was never scored
    pub accessibility: Option<f64>,
    /// Total population
    pub population: i64,
    /// Water points serving the area
    pub water_points: i64,
    /// High-capacity water points
    pub high_capacity: i64,
    /// Medium-capacity water points
    pub medium_capacity: i64,
    /// Low-capacity water points
    pub low_capacity: i64,
}

impl AreaStats {
    pub fn category(&self) -> AccessibilityCategory {
        classify(self.accessibility)
    }
}

/// Subcounty-wide aggregate statistics
#[derive(Debug, Clone, Default)]
pub struct SubcountySummary {
    pub total_areas: i64,
    pub avg_accessibility: Option<f64>,
    pub min_accessibility: Option<f64>,
    pub max_accessibility: Option<f64>,
    pub total_population: Option<i64>,
    pub total_water_points: Option<i64>,
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for external completion providers
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit a prompt and return the raw text reply
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_buckets() {
        assert_eq!(classify(Some(0.0)), AccessibilityCategory::VeryWeak);
        assert_eq!(classify(Some(0.999)), AccessibilityCategory::VeryWeak);
        assert_eq!(classify(Some(1.1)), AccessibilityCategory::Weak);
        assert_eq!(classify(Some(1.35)), AccessibilityCategory::Good);
        assert_eq!(classify(Some(2.7)), AccessibilityCategory::VeryGood);
        assert_eq!(classify(None), AccessibilityCategory::Unknown);
    }

    #[test]
    fn test_classify_boundaries_belong_to_upper_bucket() {
        assert_eq!(classify(Some(1.0)), AccessibilityCategory::Weak);
        assert_eq!(classify(Some(1.2)), AccessibilityCategory::Good);
        assert_eq!(classify(Some(1.5)), AccessibilityCategory::VeryGood);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AccessibilityCategory::VeryWeak.to_string(), "Very Weak");
        assert_eq!(AccessibilityCategory::VeryGood.to_string(), "Very Good");
        assert_eq!(AccessibilityCategory::Unknown.as_str(), "Unknown");
    }

    #[test]
    fn test_query_request_default_user() {
        let req: QueryRequest =
            serde_json::from_str(r#"{"query": "Compare Makima and Karaba"}"#).unwrap();
        assert_eq!(req.user_id, "anonymous");
        assert_eq!(req.query, "Compare Makima and Karaba");
    }

    #[test]
    fn test_area_stats_category() {
        let area = AreaStats {
            name: "MAKIMA".to_string(),
            accessibility: Some(0.968),
            population: 3245,
            water_points: 3,
            high_capacity: 0,
            medium_capacity: 1,
            low_capacity: 2,
        };
        assert_eq!(area.category(), AccessibilityCategory::VeryWeak);
    }
}
