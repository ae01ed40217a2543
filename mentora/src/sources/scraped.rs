//! Candidate source backed by per-platform catalog scrapers

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::warn;

use crate::models::{CandidateBatch, SourceTag, UserProfile};

use super::traits::{CatalogScraper, SearchConstraints};

/// Invokes one catalog scraper per platform, concurrently, each under its
/// own timeout. Scraper order is the fixed platform order used for source
/// priority, so the returned batches are already priority-ordered.
///
/// A scraper that fails or times out contributes an empty batch and a
/// warning; it never aborts the other platforms.
pub struct ScrapedSource {
    scrapers: Vec<Arc<dyn CatalogScraper>>,
    timeout: Duration,
}

impl ScrapedSource {
    /// Create a source over the given scrapers. The order of `scrapers` is
    /// the platform priority order.
    pub fn new(scrapers: Vec<Arc<dyn CatalogScraper>>, timeout: Duration) -> Self {
        Self { scrapers, timeout }
    }

    /// Fetch one batch per platform plus warnings for degraded platforms
    pub async fn fetch(
        &self,
        profile: &UserProfile,
        limit: usize,
    ) -> (Vec<CandidateBatch>, Vec<String>) {
        let constraints = SearchConstraints {
            budget: profile.budget,
            difficulty: profile.preferred_difficulty,
            limit,
        };

        let calls = self.scrapers.iter().map(|scraper| {
            let tag = SourceTag::Scraped(scraper.platform());
            let constraints = constraints.clone();
            async move {
                let outcome = timeout(
                    self.timeout,
                    scraper.search(&profile.specialization, &constraints),
                )
                .await;
                (tag, outcome)
            }
        });

        let mut batches = Vec::with_capacity(self.scrapers.len());
        let mut warnings = Vec::new();

        for (tag, outcome) in join_all(calls).await {
            match outcome {
                Ok(Ok(courses)) => batches.push(CandidateBatch::new(tag, courses)),
                Ok(Err(err)) => {
                    warn!(source = %tag, error = %err, "catalog scraper failed");
                    warnings.push(format!("{} unavailable: {}", tag, err));
                    batches.push(CandidateBatch::empty(tag));
                }
                Err(_) => {
                    warn!(source = %tag, timeout = ?self.timeout, "catalog scraper timed out");
                    warnings.push(format!("{} timed out after {:?}", tag, self.timeout));
                    batches.push(CandidateBatch::empty(tag));
                }
            }
        }

        (batches, warnings)
    }
}
