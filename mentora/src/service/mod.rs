//! Recommendation orchestration
//!
//! One entry point per request: load the profile, invoke the three
//! candidate sources concurrently with per-call timeouts, aggregate, and
//! optionally hand the result to the notification collaborator. Only a
//! missing user or an invalid budget aborts the request; every other
//! failure degrades into a warning on the result.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::aggregate::Aggregator;
use crate::config::MentoraConfig;
use crate::index::EmbeddingIndex;
use crate::models::{CandidateBatch, RankedResult, SourceTag, UserProfile};
use crate::sources::{
    CatalogScraper, GeneratedSource, MatchedSource, NotificationSender, ScrapedSource,
    TextCompletion,
};
use crate::store::ProfileStore;
use crate::{MentoraError, Result};

/// Orchestrates a recommendation request end to end.
///
/// Stateless across requests: the only shared state is the read-only
/// embedding index, which is snapshot-swapped by its loader.
pub struct RecommendationService {
    store: Arc<dyn ProfileStore>,
    generated: GeneratedSource,
    scraped: ScrapedSource,
    matched: MatchedSource,
    notifier: Option<Arc<dyn NotificationSender>>,
    aggregator: Aggregator,
    source_timeout: Duration,
}

impl RecommendationService {
    /// Wire a service from its collaborators and configuration.
    ///
    /// `scrapers` should be ordered by the configured platform priority;
    /// [`Self::order_scrapers`] does that for an arbitrary collection.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        completion: Arc<dyn TextCompletion>,
        scrapers: Vec<Arc<dyn CatalogScraper>>,
        index: Arc<EmbeddingIndex>,
        notifier: Option<Arc<dyn NotificationSender>>,
        config: &MentoraConfig,
    ) -> Self {
        let scrapers = Self::order_scrapers(scrapers, config);
        Self {
            store,
            generated: GeneratedSource::new(completion),
            scraped: ScrapedSource::new(scrapers, config.sources.timeout),
            matched: MatchedSource::new(
                index,
                config.sources.matched_query_k,
                config.sources.matched_limit,
            ),
            notifier,
            aggregator: Aggregator::new(config.aggregation.clone()),
            source_timeout: config.sources.timeout,
        }
    }

    /// Sort scrapers into the configured platform order; platforms outside
    /// the configured order keep their relative position at the end.
    pub fn order_scrapers(
        mut scrapers: Vec<Arc<dyn CatalogScraper>>,
        config: &MentoraConfig,
    ) -> Vec<Arc<dyn CatalogScraper>> {
        let order = &config.aggregation.platform_order;
        scrapers.sort_by_key(|s| {
            order
                .iter()
                .position(|p| *p == s.platform())
                .unwrap_or(order.len())
        });
        scrapers
    }

    /// Produce a ranked recommendation for the given user.
    ///
    /// Always returns a result object for degraded-but-recoverable
    /// conditions: failed sources contribute empty batches and entries in
    /// `warnings`. Only [`MentoraError::UserNotFound`] and
    /// [`MentoraError::InvalidBudget`] abort the request.
    pub async fn recommend(&self, user_id: &str, limit: usize, notify: bool) -> Result<RankedResult> {
        let profile = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|e| MentoraError::Store(e.to_string()))?
            .ok_or_else(|| MentoraError::UserNotFound {
                user_id: user_id.to_string(),
            })?;

        if !profile.budget.is_finite() || profile.budget < 0.0 {
            return Err(MentoraError::InvalidBudget {
                value: profile.budget.to_string(),
            });
        }

        let request_id = uuid::Uuid::new_v4();
        info!(
            %request_id,
            user_id,
            specialization = %profile.specialization,
            budget = profile.budget,
            difficulty = %profile.preferred_difficulty,
            "running recommendation request"
        );

        let mut warnings = Vec::new();
        let mut batches = Vec::new();

        // The three sources are independent; run them concurrently, each
        // under the per-source timeout. ScrapedSource applies the timeout
        // per platform internally.
        let (generated_outcome, (scraped_batches, scraped_warnings), matched_outcome) = tokio::join!(
            timeout(self.source_timeout, self.generated.fetch(&profile, limit)),
            self.scraped.fetch(&profile, limit),
            timeout(self.source_timeout, async { self.matched.fetch(&profile) }),
        );

        match generated_outcome {
            Ok(Ok(batch)) => batches.push(batch),
            Ok(Err(err)) => {
                warn!(error = %err, "generated source degraded");
                warnings.push(format!("{} unavailable: {}", SourceTag::Generated, err));
                batches.push(CandidateBatch::empty(SourceTag::Generated));
            }
            Err(_) => {
                warn!(timeout = ?self.source_timeout, "generated source timed out");
                warnings.push(format!(
                    "{} timed out after {:?}",
                    SourceTag::Generated,
                    self.source_timeout
                ));
                batches.push(CandidateBatch::empty(SourceTag::Generated));
            }
        }

        match matched_outcome {
            Ok(Ok(batch)) => batches.push(batch),
            Ok(Err(err)) => {
                warn!(error = %err, "matched source degraded");
                warnings.push(format!("{} unavailable: {}", SourceTag::Matched, err));
                batches.push(CandidateBatch::empty(SourceTag::Matched));
            }
            Err(_) => {
                warn!(timeout = ?self.source_timeout, "matched source timed out");
                warnings.push(format!(
                    "{} timed out after {:?}",
                    SourceTag::Matched,
                    self.source_timeout
                ));
                batches.push(CandidateBatch::empty(SourceTag::Matched));
            }
        }

        batches.extend(scraped_batches);
        warnings.extend(scraped_warnings);

        let courses = self.aggregator.aggregate(&batches, &profile, limit);

        let result = RankedResult {
            courses,
            batches,
            warnings,
            generated_at: Utc::now(),
        };

        if notify {
            self.spawn_notification(&profile, &result);
        }

        Ok(result)
    }

    /// Fire-and-forget notification hand-off. Failure is reported in the
    /// logs but never invalidates the recommendation result.
    fn spawn_notification(&self, profile: &UserProfile, result: &RankedResult) {
        let Some(notifier) = self.notifier.clone() else {
            warn!("notification requested but no sender is configured");
            return;
        };
        let Some(recipient) = profile.email.clone() else {
            warn!(user_id = %profile.id, "notification requested but profile has no email");
            return;
        };

        let subject = format!("Course recommendations for {}", profile.specialization);
        let body = notification_body(result);

        tokio::spawn(async move {
            if let Err(err) = notifier.send(&recipient, &subject, &body).await {
                error!(error = %err, recipient, "notification delivery failed");
            }
        });
    }
}

/// Plain-text summary of a ranked result for notification delivery
fn notification_body(result: &RankedResult) -> String {
    let mut body = String::from("Your recommended courses:\n");
    for ranked in &result.courses {
        let _ = writeln!(
            body,
            "- {} ({}, {}) {}",
            ranked.course.title, ranked.course.platform, ranked.source, ranked.course.link
        );
    }
    if result.courses.is_empty() {
        body.push_str("No courses matched your preferences this time.\n");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Difficulty, Platform, LINK_UNAVAILABLE};
    use crate::sources::SourceError;
    use crate::store::InMemoryProfileStore;
    use crate::sources::{MockCatalogScraper, MockTextCompletion};

    fn profile(budget: f64) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: None,
            education_level: "undergraduate".to_string(),
            specialization: "Python".to_string(),
            budget,
            preferred_difficulty: Difficulty::Beginner,
            preferred_platform: None,
            quiz_score: Some(7),
            embedding: None,
        }
    }

    fn completion_returning(json: &str) -> Arc<dyn TextCompletion> {
        let json = json.to_string();
        let mut completion = MockTextCompletion::new();
        completion
            .expect_complete()
            .returning(move |_| Ok(json.clone()));
        Arc::new(completion)
    }

    fn udemy_scraper(courses: Vec<Course>) -> Arc<dyn CatalogScraper> {
        let mut scraper = MockCatalogScraper::new();
        scraper.expect_platform().returning(|| Platform::Udemy);
        scraper
            .expect_search()
            .returning(move |_, _| Ok(courses.clone()));
        Arc::new(scraper)
    }

    fn course(title: &str, price: f64) -> Course {
        Course {
            title: title.to_string(),
            platform: Platform::Udemy,
            price,
            rating: Some(4.0),
            difficulty: Difficulty::Beginner,
            link: LINK_UNAVAILABLE.to_string(),
            embedding: None,
        }
    }

    async fn service_with(
        store_profile: Option<UserProfile>,
        completion: Arc<dyn TextCompletion>,
        scrapers: Vec<Arc<dyn CatalogScraper>>,
    ) -> RecommendationService {
        let store = Arc::new(InMemoryProfileStore::new());
        if let Some(p) = store_profile {
            store.insert(p).await;
        }
        let config = MentoraConfig::default();
        let index = Arc::new(EmbeddingIndex::new(config.index.dimension));
        RecommendationService::new(store, completion, scrapers, index, None, &config)
    }

    #[tokio::test]
    async fn test_unknown_user_aborts() {
        let service = service_with(None, completion_returning("[]"), vec![]).await;
        let err = service.recommend("nobody", 3, false).await.unwrap_err();
        assert!(matches!(err, MentoraError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_budget_aborts() {
        let service = service_with(
            Some(profile(-5.0)),
            completion_returning("[]"),
            vec![],
        )
        .await;
        let err = service.recommend("u1", 3, false).await.unwrap_err();
        assert!(matches!(err, MentoraError::InvalidBudget { .. }));
    }

    #[tokio::test]
    async fn test_budget_scenario_excludes_over_budget_generated() {
        let raw = r#"[
            {"title":"A","platform":"udemy","price":15,"difficulty_level":"Beginner","rating":4.5},
            {"title":"B","platform":"udemy","price":25,"difficulty_level":"Beginner","rating":4.8}
        ]"#;
        let service = service_with(Some(profile(20.0)), completion_returning(raw), vec![]).await;

        let result = service.recommend("u1", 3, false).await.unwrap();
        let titles: Vec<&str> = result
            .courses
            .iter()
            .map(|r| r.course.title.as_str())
            .collect();
        assert!(titles.contains(&"A"));
        assert!(!titles.contains(&"B"));
    }

    #[tokio::test]
    async fn test_malformed_generation_degrades_with_warning() {
        let service = service_with(
            Some(profile(20.0)),
            completion_returning("sorry, no JSON today"),
            vec![udemy_scraper(vec![course("U", 10.0)])],
        )
        .await;

        let result = service.recommend("u1", 3, false).await.unwrap();
        assert!(result.is_degraded());
        assert!(result.warnings.iter().any(|w| w.contains("generated")));
        // The scraped source still contributes
        assert!(result
            .courses
            .iter()
            .any(|r| r.source == SourceTag::Scraped(Platform::Udemy)));
    }

    #[tokio::test]
    async fn test_failing_scraper_named_in_warnings() {
        let mut failing = MockCatalogScraper::new();
        failing.expect_platform().returning(|| Platform::YouTube);
        failing
            .expect_search()
            .returning(|_, _| Err(SourceError::Unavailable("blocked".to_string())));

        let service = service_with(
            Some(profile(20.0)),
            completion_returning(r#"[{"title":"A","platform":"udemy","price":5}]"#),
            vec![udemy_scraper(vec![course("U", 10.0)]), Arc::new(failing)],
        )
        .await;

        let result = service.recommend("u1", 3, false).await.unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("scraped:youtube")));
        let sources: Vec<String> = result.courses.iter().map(|r| r.source.to_string()).collect();
        assert!(sources.contains(&"generated".to_string()));
        assert!(sources.contains(&"scraped:udemy".to_string()));
    }

    #[tokio::test]
    async fn test_result_carries_unfiltered_batches() {
        let raw = r#"[{"title":"A","platform":"udemy","price":500}]"#;
        let service = service_with(Some(profile(20.0)), completion_returning(raw), vec![]).await;

        let result = service.recommend("u1", 3, false).await.unwrap();
        // Over-budget candidate is filtered from the ranking but still
        // visible in the transparency batches
        assert!(result.courses.is_empty());
        let generated = result
            .batches
            .iter()
            .find(|b| b.source == SourceTag::Generated)
            .unwrap();
        assert_eq!(generated.courses.len(), 1);
    }

    #[test]
    fn test_notification_body_lists_courses() {
        let result = RankedResult {
            courses: vec![],
            batches: vec![],
            warnings: vec![],
            generated_at: Utc::now(),
        };
        let body = notification_body(&result);
        assert!(body.contains("No courses matched"));
    }
}
