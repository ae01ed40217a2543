//! User profile model

use serde::{Deserialize, Serialize};

use super::course::{Difficulty, Platform};

/// A learner's profile, read-only input to a recommendation request.
///
/// Owned by the external profile store; the engine never mutates it during
/// a request. `quiz_score` and `preferred_platform` default rather than
/// fail when absent; `budget` is validated at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Store identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Contact address for the optional notification hand-off
    #[serde(default)]
    pub email: Option<String>,

    /// Education level, free text ("undergraduate", "high school", ...)
    pub education_level: String,

    /// Topic the learner wants courses for
    pub specialization: String,

    /// Spending limit in the user's currency; must be a non-negative number
    pub budget: f64,

    /// Preferred course difficulty
    #[serde(default)]
    pub preferred_difficulty: Difficulty,

    /// Preferred platform, if the learner has one
    #[serde(default)]
    pub preferred_platform: Option<Platform>,

    /// Latest quiz score, 0-10; defaults to 0 when the quiz has not been taken
    #[serde(default)]
    pub quiz_score: Option<u8>,

    /// Profile embedding for index matching; length must equal the
    /// configured index dimension wherever it is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl UserProfile {
    /// Quiz score with the documented default applied
    pub fn quiz_score_or_default(&self) -> u8 {
        self.quiz_score.unwrap_or(0).min(10)
    }
}
