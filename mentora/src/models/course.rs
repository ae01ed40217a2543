//! Course model with lenient construction from loose JSON
//!
//! Candidate records arrive from duck-typed origins (generated JSON, scraped
//! listings, index metadata). The schema here is explicit: optional fields
//! are default-filled at the aggregation boundary instead of being trusted
//! implicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel link used when a source did not provide one
pub const LINK_UNAVAILABLE: &str = "about:blank";

/// Course difficulty levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Introductory material
    Beginner,
    /// Assumes working knowledge of the topic
    Intermediate,
    /// Specialist material
    Advanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

impl Difficulty {
    /// Parse a difficulty name, defaulting to `Beginner` for anything
    /// unrecognized. Generated output is not trusted to spell these
    /// consistently.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

/// Course platform. Open-ended: the catalog is not limited to the providers
/// the engine knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Udemy,
    Coursera,
    YouTube,
    /// Any other provider, kept verbatim
    Other(String),
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Udemy => write!(f, "udemy"),
            Self::Coursera => write!(f, "coursera"),
            Self::YouTube => write!(f, "youtube"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Platform {
    /// Parse a platform name case-insensitively
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "udemy" => Self::Udemy,
            "coursera" => Self::Coursera,
            "youtube" => Self::YouTube,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Platform::from_name(&s)
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.to_string()
    }
}

/// A single course record, as proposed by one candidate source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    /// Course title
    pub title: String,

    /// Originating platform
    pub platform: Platform,

    /// Price in the user's currency; 0 for free courses
    #[serde(default)]
    pub price: f64,

    /// Rating out of 5, when the source reports one
    #[serde(default)]
    pub rating: Option<f32>,

    /// Difficulty level
    #[serde(default, alias = "difficulty_level")]
    pub difficulty: Difficulty,

    /// Direct link to the course; [`LINK_UNAVAILABLE`] when absent
    #[serde(default = "default_link")]
    pub link: String,

    /// Embedding vector, when the course has been ingested into the index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

fn default_link() -> String {
    LINK_UNAVAILABLE.to_string()
}

impl Course {
    /// Build a course from a loose JSON object, filling defaults for any
    /// optional field.
    ///
    /// Accepts the field aliases generated output has been observed to use
    /// (`course_name` for title, `difficulty_level` for difficulty, `url`
    /// for link). Returns `None` for records with no usable title — and for
    /// non-objects — so callers can skip-and-warn rather than abort.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let title = obj
            .get("title")
            .or_else(|| obj.get("course_name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())?
            .to_string();

        let platform = obj
            .get("platform")
            .and_then(Value::as_str)
            .map(Platform::from_name)
            .unwrap_or_else(|| Platform::Other("unknown".to_string()));

        // Scraped listings sometimes report a non-numeric price ("Varies");
        // those are kept and treated as free rather than dropped.
        let price = obj
            .get("price")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .max(0.0);

        let rating = obj
            .get("rating")
            .and_then(Value::as_f64)
            .map(|r| r.clamp(0.0, 5.0) as f32);

        let difficulty = obj
            .get("difficulty_level")
            .or_else(|| obj.get("difficulty"))
            .and_then(Value::as_str)
            .map(Difficulty::from_name)
            .unwrap_or_default();

        let link = obj
            .get("link")
            .or_else(|| obj.get("url"))
            .and_then(Value::as_str)
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(LINK_UNAVAILABLE)
            .to_string();

        Some(Course {
            title,
            platform,
            price,
            rating,
            difficulty,
            link,
            embedding: None,
        })
    }

    /// Normalized key used for deduplication across sources
    pub fn dedup_key(&self) -> (String, String) {
        (
            self.title.trim().to_lowercase(),
            self.platform.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let value = json!({
            "title": "Rust Fundamentals",
            "platform": "Udemy",
            "price": 19.99,
            "rating": 4.7,
            "difficulty_level": "Intermediate",
            "link": "https://udemy.com/rust"
        });

        let course = Course::from_value(&value).unwrap();
        assert_eq!(course.title, "Rust Fundamentals");
        assert_eq!(course.platform, Platform::Udemy);
        assert_eq!(course.price, 19.99);
        assert_eq!(course.rating, Some(4.7));
        assert_eq!(course.difficulty, Difficulty::Intermediate);
        assert_eq!(course.link, "https://udemy.com/rust");
    }

    #[test]
    fn test_from_value_fills_defaults() {
        let value = json!({ "course_name": "Intro to Python" });

        let course = Course::from_value(&value).unwrap();
        assert_eq!(course.title, "Intro to Python");
        assert_eq!(course.platform, Platform::Other("unknown".to_string()));
        assert_eq!(course.price, 0.0);
        assert_eq!(course.rating, None);
        assert_eq!(course.difficulty, Difficulty::Beginner);
        assert_eq!(course.link, LINK_UNAVAILABLE);
    }

    #[test]
    fn test_from_value_non_numeric_price_treated_as_free() {
        let value = json!({ "title": "A", "platform": "udemy", "price": "Varies" });
        let course = Course::from_value(&value).unwrap();
        assert_eq!(course.price, 0.0);
    }

    #[test]
    fn test_from_value_rejects_untitled_and_non_objects() {
        assert!(Course::from_value(&json!({ "platform": "udemy" })).is_none());
        assert!(Course::from_value(&json!({ "title": "   " })).is_none());
        assert!(Course::from_value(&json!("just a string")).is_none());
        assert!(Course::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_dedup_key_normalizes_case_and_whitespace() {
        let a = Course::from_value(&json!({ "title": "  Rust 101 ", "platform": "Udemy" })).unwrap();
        let b = Course::from_value(&json!({ "title": "rust 101", "platform": "UDEMY" })).unwrap();
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_platform_round_trip() {
        assert_eq!(Platform::from_name("YouTube"), Platform::YouTube);
        assert_eq!(Platform::from_name("edX"), Platform::Other("edx".to_string()));
        assert_eq!(Platform::YouTube.to_string(), "youtube");

        let json = serde_json::to_string(&Platform::Coursera).unwrap();
        assert_eq!(json, "\"coursera\"");
        let back: Platform = serde_json::from_str("\"Coursera\"").unwrap();
        assert_eq!(back, Platform::Coursera);
    }

    #[test]
    fn test_difficulty_lenient_parse() {
        assert_eq!(Difficulty::from_name("advanced"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_name("ADVANCED"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_name("expert"), Difficulty::Beginner);
    }
}
