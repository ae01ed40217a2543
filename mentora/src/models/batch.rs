//! Candidate batches and ranked results
//!
//! Both are request-scoped: created during one `recommend` call and
//! discarded with it. Nothing here is persisted or cached across requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::course::{Course, Platform};

/// The origin of a candidate batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceTag {
    /// Suggested by the generative model
    Generated,
    /// Nearest-neighbor match from the embedding index
    Matched,
    /// Scraped from a provider's catalog
    Scraped(Platform),
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated => write!(f, "generated"),
            Self::Matched => write!(f, "matched"),
            Self::Scraped(platform) => write!(f, "scraped:{}", platform),
        }
    }
}

impl From<String> for SourceTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "generated" => Self::Generated,
            "matched" => Self::Matched,
            other => {
                if let Some(platform) = other.strip_prefix("scraped:") {
                    Self::Scraped(Platform::from_name(platform))
                } else {
                    Self::Scraped(Platform::from_name(other))
                }
            }
        }
    }
}

impl From<SourceTag> for String {
    fn from(tag: SourceTag) -> Self {
        tag.to_string()
    }
}

/// An ordered sequence of candidate courses from one source.
///
/// Order within a batch is the source's native relevance order and is
/// preserved until ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateBatch {
    /// Originating source
    pub source: SourceTag,

    /// Candidate courses in the source's relevance order
    pub courses: Vec<Course>,
}

impl CandidateBatch {
    /// Create a batch for the given source
    pub fn new(source: SourceTag, courses: Vec<Course>) -> Self {
        Self { source, courses }
    }

    /// An empty batch, the stand-in for a failed or silent source
    pub fn empty(source: SourceTag) -> Self {
        Self {
            source,
            courses: Vec::new(),
        }
    }
}

/// A course in the final ranking, tagged with the fields the ranking
/// decision was made on so callers and tests can audit it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCourse {
    /// The recommended course
    pub course: Course,

    /// Which source proposed it
    pub source: SourceTag,

    /// Whether the course matched the requested difficulty
    pub difficulty_match: bool,

    /// Rating used as the secondary sort key (missing rating ranks as 0)
    pub rating_key: f32,
}

/// The outcome of one recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Final blended ranking, at most `limit` courses per source category
    pub courses: Vec<RankedCourse>,

    /// The unfiltered per-source batches, for transparency
    pub batches: Vec<CandidateBatch>,

    /// One entry per source that degraded gracefully
    pub warnings: Vec<String>,

    /// When the result was produced
    pub generated_at: DateTime<Utc>,
}

impl RankedResult {
    /// Whether any source degraded during this request
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tag_display() {
        assert_eq!(SourceTag::Generated.to_string(), "generated");
        assert_eq!(SourceTag::Matched.to_string(), "matched");
        assert_eq!(
            SourceTag::Scraped(Platform::Udemy).to_string(),
            "scraped:udemy"
        );
    }

    #[test]
    fn test_source_tag_serde_round_trip() {
        let tag = SourceTag::Scraped(Platform::Coursera);
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"scraped:coursera\"");
        let back: SourceTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
