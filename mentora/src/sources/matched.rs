//! Candidate source backed by the embedding index

use std::sync::Arc;

use tracing::debug;

use crate::index::EmbeddingIndex;
use crate::models::{CandidateBatch, Course, SourceTag, UserProfile};

use super::traits::{Result, SourceError};

/// Produces candidates by nearest-neighbor matching the profile embedding
/// against the course index, then post-filtering.
///
/// The two-stage filter is intentional: proximity is the primary relevance
/// signal; difficulty and rating break ties among near-equally-similar
/// courses. Matched candidates are already difficulty-filtered and are by
/// contract never price-filtered downstream.
pub struct MatchedSource {
    index: Arc<EmbeddingIndex>,
    query_k: usize,
    limit: usize,
}

impl MatchedSource {
    /// Create a source over the given index.
    ///
    /// `query_k` is how many raw neighbors to retrieve; `limit` is the
    /// batch size after the difficulty/rating post-filter.
    pub fn new(index: Arc<EmbeddingIndex>, query_k: usize, limit: usize) -> Self {
        Self {
            index,
            query_k,
            limit,
        }
    }

    /// Fetch a candidate batch for the profile.
    ///
    /// A profile without an embedding yields an empty batch; a wrong-length
    /// embedding surfaces as a source error so the service can warn on it.
    pub fn fetch(&self, profile: &UserProfile) -> Result<CandidateBatch> {
        let Some(embedding) = &profile.embedding else {
            debug!("profile has no embedding; matched source yields nothing");
            return Ok(CandidateBatch::empty(SourceTag::Matched));
        };

        let neighbors = self
            .index
            .query(embedding, self.query_k)
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        // Distance already ordered the neighbors; keep only the requested
        // difficulty, then re-rank the remainder by descending rating.
        let mut courses: Vec<Course> = neighbors
            .into_iter()
            .map(|n| n.course)
            .filter(|c| c.difficulty == profile.preferred_difficulty)
            .collect();

        courses.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .partial_cmp(&a.rating.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        courses.truncate(self.limit);

        Ok(CandidateBatch::new(SourceTag::Matched, courses))
    }
}
