//! Reqwest-backed catalog adapter for the Coursera courses API
//!
//! Coursera exposes course search as plain JSON, so this adapter needs no
//! page parsing and ships with the engine. HTML-scraping adapters for other
//! platforms are external collaborators implementing [`CatalogScraper`].

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Course, Difficulty, Platform, LINK_UNAVAILABLE};

use super::traits::{CatalogScraper, Result, SearchConstraints, SourceError};

const COURSERA_API_URL: &str = "https://api.coursera.org/api/courses.v1";

/// Catalog scraper over Coursera's public courses API
pub struct CourseraCatalogScraper {
    client: reqwest::Client,
    base_url: String,
}

impl CourseraCatalogScraper {
    /// Create a scraper against the public API endpoint
    pub fn new() -> Self {
        Self::with_base_url(COURSERA_API_URL)
    }

    /// Create a scraper against a custom endpoint (used in tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn parse_elements(body: &Value, limit: usize) -> Vec<Course> {
        let Some(elements) = body.get("elements").and_then(Value::as_array) else {
            return Vec::new();
        };

        elements
            .iter()
            .filter_map(|element| {
                let name = element.get("name").and_then(Value::as_str)?;
                let slug = element.get("slug").and_then(Value::as_str);
                Some(Course {
                    title: name.to_string(),
                    platform: Platform::Coursera,
                    // The listings API does not expose pricing; audited
                    // Coursera courses are free
                    price: 0.0,
                    rating: None,
                    difficulty: Difficulty::default(),
                    link: slug
                        .map(|s| format!("https://www.coursera.org/learn/{}", s))
                        .unwrap_or_else(|| LINK_UNAVAILABLE.to_string()),
                    embedding: None,
                })
            })
            .take(limit)
            .collect()
    }
}

impl Default for CourseraCatalogScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogScraper for CourseraCatalogScraper {
    fn platform(&self) -> Platform {
        Platform::Coursera
    }

    async fn search(&self, topic: &str, constraints: &SearchConstraints) -> Result<Vec<Course>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", "search"), ("query", topic)])
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(format!("invalid catalog response: {}", e)))?;

        Ok(Self::parse_elements(&body, constraints.limit))
    }
}
