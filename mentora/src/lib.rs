//! # Mentora
//!
//! Course recommendation engine that blends three candidate sources into one
//! ranked short-list: free-text suggestions from a generative model, scraped
//! catalog listings from multiple providers, and nearest-neighbor matches
//! against an in-memory index of course embeddings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mentora::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     completion: Arc<dyn mentora::sources::TextCompletion>,
//! #     scrapers: Vec<Arc<dyn mentora::sources::CatalogScraper>>,
//! # ) -> Result<()> {
//! let config = ConfigBuilder::new().with_dimension(512).build()?;
//! let index = mentora::init(&config)?;
//!
//! let store = Arc::new(InMemoryProfileStore::new());
//! let service = RecommendationService::new(
//!     store,
//!     completion,
//!     scrapers,
//!     index,
//!     None,
//!     &config,
//! );
//!
//! // One call per request: always returns a result object, with warnings
//! // for any source that degraded instead of a hard failure.
//! let result = service.recommend("user-1", 3, false).await?;
//! for ranked in &result.courses {
//!     println!("{} ({})", ranked.course.title, ranked.source);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Sources**: generated (LLM), scraped (catalog adapters), matched
//!   (embedding index) — each fault-isolated, run concurrently per request
//! - **Sanitizer**: extracts structured JSON from unreliable generated text
//! - **Aggregator**: budget filter, dedup, rank, per-source truncation
//! - **Service**: orchestration, warnings, optional notification hand-off
//!
//! External collaborators (profile store, text completion, catalog scrapers,
//! notification delivery) are injected behind async traits, so hosts bring
//! their own backends.

pub mod aggregate;
pub mod config;
pub mod index;
pub mod logging;
pub mod models;
pub mod sanitize;
pub mod service;
pub mod sources;
pub mod store;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export config types
    pub use crate::config::{ConfigBuilder, ConfigLoader, MentoraConfig};

    // Re-export core model types
    pub use crate::models::{
        CandidateBatch, Course, Difficulty, Platform, RankedCourse, RankedResult, SourceTag,
        UserProfile,
    };

    // Re-export the engine surface
    pub use crate::aggregate::Aggregator;
    pub use crate::index::{EmbeddingIndex, IndexEntry};
    pub use crate::service::RecommendationService;
    pub use crate::store::{InMemoryProfileStore, ProfileStore};

    // Re-export essential result type
    pub use crate::{MentoraError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Mentora operations
#[derive(Debug, thiserror::Error)]
pub enum MentoraError {
    /// The requested user does not exist in the profile store
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    /// The user's budget is missing or not a valid non-negative number
    #[error("Invalid budget '{value}': budget must be a non-negative number")]
    InvalidBudget { value: String },

    /// An embedding vector did not match the configured dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The generative model's output could not be parsed as structured data.
    /// Carries the raw text for diagnostics.
    #[error("Generated output could not be parsed as JSON")]
    MalformedGeneratedOutput { raw: String },

    /// Error from the profile store collaborator
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for MentoraError {
    fn from(err: crate::config::ConfigError) -> Self {
        MentoraError::Configuration(err.to_string())
    }
}

impl From<crate::index::IndexError> for MentoraError {
    fn from(err: crate::index::IndexError) -> Self {
        match err {
            crate::index::IndexError::DimensionMismatch { expected, actual } => {
                MentoraError::DimensionMismatch { expected, actual }
            }
        }
    }
}

impl From<crate::sanitize::SanitizeError> for MentoraError {
    fn from(err: crate::sanitize::SanitizeError) -> Self {
        match err {
            crate::sanitize::SanitizeError::Malformed { raw } => {
                MentoraError::MalformedGeneratedOutput { raw }
            }
        }
    }
}

impl From<crate::store::StoreError> for MentoraError {
    fn from(err: crate::store::StoreError) -> Self {
        MentoraError::Store(err.to_string())
    }
}

/// Result type for Mentora operations
pub type Result<T> = std::result::Result<T, MentoraError>;

/// Initialize Mentora with the provided configuration.
///
/// Sets up logging (an already-installed global subscriber is tolerated) and
/// returns an empty [`index::EmbeddingIndex`] with the configured dimension,
/// ready for a bulk [`index::EmbeddingIndex::load`].
pub fn init(config: &config::MentoraConfig) -> Result<std::sync::Arc<index::EmbeddingIndex>> {
    let _ = logging::init(&config.logging);

    config
        .validate()
        .map_err(MentoraError::Configuration)?;

    Ok(std::sync::Arc::new(index::EmbeddingIndex::new(
        config.index.dimension,
    )))
}

/// Initialize Mentora with default configuration.
pub fn init_with_defaults() -> Result<std::sync::Arc<index::EmbeddingIndex>> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(&config)
}
