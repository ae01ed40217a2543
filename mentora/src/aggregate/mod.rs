//! Candidate aggregation and ranking
//!
//! One configurable pipeline merges the per-source candidate batches into a
//! ranked, deduplicated, budget-bounded short-list. The stages run in a
//! fixed order:
//!
//! 1. concatenate batches in deterministic source priority order
//!    (generated → matched → scraped platforms in the configured order)
//! 2. drop candidates over the user's budget (generated and scraped only;
//!    matched candidates are exempt by the source's contract)
//! 3. deduplicate by normalized (title, platform), first occurrence wins
//! 4. stable-sort by (difficulty match desc, rating desc, missing = 0)
//! 5. truncate each source category to the caller's limit and concatenate,
//!    so the caller always sees diversity across sources rather than a
//!    single global top-N

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{CandidateBatch, Platform, RankedCourse, SourceTag, UserProfile};

/// Configuration for the aggregation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Fixed ordering of scraped platforms, used as the tail of the source
    /// priority order and as the default tie-break
    pub platform_order: Vec<Platform>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            platform_order: vec![Platform::Udemy, Platform::Coursera, Platform::YouTube],
        }
    }
}

impl AggregatorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for platform in &self.platform_order {
            if !seen.insert(platform) {
                return Err(format!("duplicate platform in platform_order: {}", platform));
            }
        }
        Ok(())
    }
}

/// Merges candidate batches into one ranked short-list
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Reference to the configuration
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate candidate batches into the final ranking.
    ///
    /// Matched candidates are never price-filtered: the matched source has
    /// already difficulty-filtered them, and the exemption is an explicit
    /// contract of that source, not an oversight.
    pub fn aggregate(
        &self,
        batches: &[CandidateBatch],
        profile: &UserProfile,
        limit: usize,
    ) -> Vec<RankedCourse> {
        // Stage 1: deterministic priority order
        let mut candidates: Vec<RankedCourse> = Vec::new();
        let mut seen = HashSet::new();

        for tag in self.priority_order(batches) {
            for batch in batches.iter().filter(|b| b.source == tag) {
                for course in &batch.courses {
                    // Stage 2: budget filter for price-filterable sources
                    if price_filterable(&tag) && course.price > profile.budget {
                        continue;
                    }

                    // Stage 3: dedupe, first (highest-priority) wins
                    if !seen.insert(course.dedup_key()) {
                        continue;
                    }

                    candidates.push(RankedCourse {
                        difficulty_match: course.difficulty == profile.preferred_difficulty,
                        rating_key: course.rating.unwrap_or(0.0),
                        source: tag.clone(),
                        course: course.clone(),
                    });
                }
            }
        }

        // Stage 4: stable sort preserves priority order among equal keys
        candidates.sort_by(|a, b| {
            b.difficulty_match
                .cmp(&a.difficulty_match)
                .then_with(|| {
                    b.rating_key
                        .partial_cmp(&a.rating_key)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        // Stage 5: per-category truncation, concatenated in priority order
        let mut result = Vec::new();
        for tag in self.priority_order(batches) {
            result.extend(
                candidates
                    .iter()
                    .filter(|c| c.source == tag)
                    .take(limit)
                    .cloned(),
            );
        }
        result
    }

    /// The deterministic source priority order: generated, matched, then
    /// scraped platforms in the configured order. Scraped batches for
    /// platforms outside the configured order keep their batch order at the
    /// end so no source is silently dropped.
    fn priority_order(&self, batches: &[CandidateBatch]) -> Vec<SourceTag> {
        let mut order = vec![SourceTag::Generated, SourceTag::Matched];
        order.extend(
            self.config
                .platform_order
                .iter()
                .map(|p| SourceTag::Scraped(p.clone())),
        );

        for batch in batches {
            if !order.contains(&batch.source) {
                order.push(batch.source.clone());
            }
        }
        order
    }
}

/// Whether a source's candidates are subject to the budget filter
fn price_filterable(tag: &SourceTag) -> bool {
    !matches!(tag, SourceTag::Matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Difficulty, LINK_UNAVAILABLE};

    fn course(title: &str, platform: Platform, price: f64, rating: Option<f32>, difficulty: Difficulty) -> Course {
        Course {
            title: title.to_string(),
            platform,
            price,
            rating,
            difficulty,
            link: LINK_UNAVAILABLE.to_string(),
            embedding: None,
        }
    }

    fn profile(budget: f64, difficulty: Difficulty) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: None,
            education_level: "undergraduate".to_string(),
            specialization: "Python".to_string(),
            budget,
            preferred_difficulty: difficulty,
            preferred_platform: None,
            quiz_score: None,
            embedding: None,
        }
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(AggregatorConfig::default())
    }

    #[test]
    fn test_budget_filter_drops_expensive_candidates() {
        let batches = vec![CandidateBatch::new(
            SourceTag::Generated,
            vec![
                course("A", Platform::Udemy, 15.0, Some(4.5), Difficulty::Beginner),
                course("B", Platform::Udemy, 25.0, Some(5.0), Difficulty::Beginner),
            ],
        )];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        let titles: Vec<&str> = result.iter().map(|r| r.course.title.as_str()).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[test]
    fn test_matched_candidates_exempt_from_budget_filter() {
        let batches = vec![
            CandidateBatch::new(
                SourceTag::Matched,
                vec![course("Pricey", Platform::Coursera, 500.0, Some(4.9), Difficulty::Beginner)],
            ),
            CandidateBatch::new(
                SourceTag::Scraped(Platform::Udemy),
                vec![course("Also pricey", Platform::Udemy, 500.0, Some(4.9), Difficulty::Beginner)],
            ),
        ];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        let titles: Vec<&str> = result.iter().map(|r| r.course.title.as_str()).collect();
        assert_eq!(titles, vec!["Pricey"]);
    }

    #[test]
    fn test_dedupe_keeps_highest_priority_occurrence() {
        let batches = vec![
            CandidateBatch::new(
                SourceTag::Scraped(Platform::Udemy),
                vec![course("Rust 101", Platform::Udemy, 5.0, Some(3.0), Difficulty::Beginner)],
            ),
            CandidateBatch::new(
                SourceTag::Generated,
                vec![course("rust 101", Platform::Udemy, 5.0, Some(3.0), Difficulty::Beginner)],
            ),
        ];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        assert_eq!(result.len(), 1);
        // Generated outranks scraped regardless of batch slice order
        assert_eq!(result[0].source, SourceTag::Generated);
    }

    #[test]
    fn test_sort_prefers_difficulty_match_then_rating() {
        let batches = vec![CandidateBatch::new(
            SourceTag::Generated,
            vec![
                course("high-rated wrong level", Platform::Udemy, 5.0, Some(5.0), Difficulty::Advanced),
                course("low-rated right level", Platform::Udemy, 5.0, Some(2.0), Difficulty::Beginner),
                course("high-rated right level", Platform::Udemy, 5.0, Some(4.0), Difficulty::Beginner),
                course("unrated right level", Platform::Udemy, 5.0, None, Difficulty::Beginner),
            ],
        )];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 10);
        let titles: Vec<&str> = result.iter().map(|r| r.course.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "high-rated right level",
                "low-rated right level",
                "unrated right level",
                "high-rated wrong level",
            ]
        );
    }

    #[test]
    fn test_stable_under_equal_keys() {
        // Equal difficulty match and rating: original priority order must
        // be preserved (stable sort property).
        let batches = vec![CandidateBatch::new(
            SourceTag::Generated,
            vec![
                course("first", Platform::Udemy, 5.0, Some(4.0), Difficulty::Beginner),
                course("second", Platform::Coursera, 5.0, Some(4.0), Difficulty::Beginner),
                course("third", Platform::YouTube, 5.0, Some(4.0), Difficulty::Beginner),
            ],
        )];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 10);
        let titles: Vec<&str> = result.iter().map(|r| r.course.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_per_category_truncation_blends_sources() {
        let r#gen: Vec<Course> = (0..5)
            .map(|i| course(&format!("gen{}", i), Platform::Udemy, 5.0, Some(4.0), Difficulty::Beginner))
            .collect();
        let scraped: Vec<Course> = (0..5)
            .map(|i| course(&format!("scr{}", i), Platform::Coursera, 5.0, Some(4.0), Difficulty::Beginner))
            .collect();

        let batches = vec![
            CandidateBatch::new(SourceTag::Generated, r#gen),
            CandidateBatch::new(SourceTag::Scraped(Platform::Coursera), scraped),
        ];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 2);
        assert_eq!(result.len(), 4);
        assert!(result[..2].iter().all(|r| r.source == SourceTag::Generated));
        assert!(result[2..]
            .iter()
            .all(|r| r.source == SourceTag::Scraped(Platform::Coursera)));
    }

    #[test]
    fn test_scraped_platforms_follow_configured_order() {
        let batches = vec![
            CandidateBatch::new(
                SourceTag::Scraped(Platform::YouTube),
                vec![course("yt", Platform::YouTube, 0.0, Some(4.0), Difficulty::Beginner)],
            ),
            CandidateBatch::new(
                SourceTag::Scraped(Platform::Udemy),
                vec![course("ud", Platform::Udemy, 0.0, Some(4.0), Difficulty::Beginner)],
            ),
        ];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        let titles: Vec<&str> = result.iter().map(|r| r.course.title.as_str()).collect();
        // Udemy precedes YouTube in the default platform order even though
        // the batches arrived reversed.
        assert_eq!(titles, vec!["ud", "yt"]);
    }

    #[test]
    fn test_unknown_platform_batches_are_not_dropped() {
        let batches = vec![CandidateBatch::new(
            SourceTag::Scraped(Platform::Other("edx".to_string())),
            vec![course("edx course", Platform::Other("edx".to_string()), 0.0, None, Difficulty::Beginner)],
        )];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_audit_fields_populated() {
        let batches = vec![CandidateBatch::new(
            SourceTag::Generated,
            vec![course("A", Platform::Udemy, 5.0, Some(4.5), Difficulty::Advanced)],
        )];

        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        assert!(!result[0].difficulty_match);
        assert_eq!(result[0].rating_key, 4.5);
    }

    #[test]
    fn test_config_rejects_duplicate_platforms() {
        let config = AggregatorConfig {
            platform_order: vec![Platform::Udemy, Platform::Udemy],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_batches_yield_empty_result() {
        let batches = vec![
            CandidateBatch::empty(SourceTag::Generated),
            CandidateBatch::empty(SourceTag::Matched),
        ];
        let result = aggregator().aggregate(&batches, &profile(20.0, Difficulty::Beginner), 3);
        assert!(result.is_empty());
    }
}
