//! Trait definitions for the engine's external collaborators

use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Course, Difficulty, Platform};

/// Error type for candidate source and collaborator failures.
///
/// Every variant is recoverable at the service boundary: it becomes an
/// empty batch plus a warning naming the source, never a failed request.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The collaborator was unreachable or returned a failure
    #[error("{0}")]
    Unavailable(String),

    /// The call exceeded its per-source timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Generated output could not be parsed as structured data
    #[error("malformed generated output")]
    Malformed { raw: String },
}

impl From<crate::sanitize::SanitizeError> for SourceError {
    fn from(err: crate::sanitize::SanitizeError) -> Self {
        match err {
            crate::sanitize::SanitizeError::Malformed { raw } => SourceError::Malformed { raw },
        }
    }
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Black-box text completion call. May return malformed or empty text;
/// tolerating that is the caller's job, not the implementor's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletion: Send + Sync + 'static {
    /// Complete the given prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Constraints passed to a catalog search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConstraints {
    /// The user's spending limit
    pub budget: f64,

    /// Requested difficulty level
    pub difficulty: Difficulty,

    /// Upper bound on listings the scraper should return
    pub limit: usize,
}

/// A catalog scraper for one platform. May raise or time out; page-parsing
/// details live in the implementor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogScraper: Send + Sync + 'static {
    /// The platform this scraper covers
    fn platform(&self) -> Platform;

    /// Search the platform's catalog for courses on `topic`
    async fn search(&self, topic: &str, constraints: &SearchConstraints) -> Result<Vec<Course>>;
}

/// Delivery collaborator for the optional result notification
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync + 'static {
    /// Send a notification; failure is reported, never fatal
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}
