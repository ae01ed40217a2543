//! Candidate source backed by a generative text model

use std::sync::Arc;

use tracing::debug;

use crate::models::{CandidateBatch, SourceTag, UserProfile};
use crate::sanitize;

use super::traits::{Result, TextCompletion};

/// Produces candidates by prompting a text-completion service and
/// sanitizing whatever comes back.
///
/// Malformed output is terminal for this source's contribution to the
/// current request; there is no automatic retry.
pub struct GeneratedSource {
    completion: Arc<dyn TextCompletion>,
}

impl GeneratedSource {
    /// Create a source over the given completion service
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    /// Build the recommendation prompt for a profile
    pub fn build_prompt(profile: &UserProfile, limit: usize) -> String {
        let platform_line = match &profile.preferred_platform {
            Some(platform) => format!("Their preferred platform is {}.", platform),
            None => "Courses should include Udemy, Coursera, and YouTube.".to_string(),
        };

        format!(
            "Recommend the best {limit} online courses for a {education_level} student \
             specializing in {specialization}.\n\
             The student has a quiz score of {quiz_score}/10 and a budget of ${budget}.\n\
             Their preferred difficulty level is {difficulty}.\n\
             {platform_line}\n\
             Return a STRICT JSON array only, where each object has: \
             \"title\", \"platform\", \"price\" (0 if free), \"rating\" (out of 5), \
             \"difficulty_level\" (Beginner, Intermediate, or Advanced), and \"link\".\n\
             No extra text or explanation.",
            limit = limit,
            education_level = profile.education_level,
            specialization = profile.specialization,
            quiz_score = profile.quiz_score_or_default(),
            budget = profile.budget,
            difficulty = profile.preferred_difficulty,
            platform_line = platform_line,
        )
    }

    /// Fetch a candidate batch for the profile
    pub async fn fetch(&self, profile: &UserProfile, limit: usize) -> Result<CandidateBatch> {
        let prompt = Self::build_prompt(profile, limit);
        let raw = self.completion.complete(&prompt).await?;

        debug!(bytes = raw.len(), "received completion for generated source");

        let value = sanitize::sanitize(&raw)?;
        let courses = sanitize::parse_courses(&value);

        Ok(CandidateBatch::new(SourceTag::Generated, courses))
    }
}
