//! Profile store collaborator
//!
//! The engine treats the persistent document store as external: it only
//! needs find-by-id and field updates. [`InMemoryProfileStore`] is provided
//! for tests and embedded hosts.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::models::UserProfile;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was unreachable or the operation failed
    #[error("store operation failed: {0}")]
    Operation(String),

    /// A profile could not be (de)serialized
    #[error("profile serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent profile store, specified only at its interface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// Find a profile by its identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Merge the given fields into a stored profile.
    ///
    /// Returns whether a profile with that id existed.
    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<bool>;
}

/// In-memory profile store for tests and embedded hosts
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile, keyed by its id
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<bool> {
        let mut profiles = self.profiles.write().await;

        let Some(profile) = profiles.get(id) else {
            return Ok(false);
        };

        // Merge on the JSON representation so callers can update any subset
        // of fields without a typed patch struct.
        let mut value = serde_json::to_value(profile)?;
        if let Value::Object(object) = &mut value {
            for (key, field) in fields {
                object.insert(key, field);
            }
        }

        let updated: UserProfile = serde_json::from_value(value)?;
        profiles.insert(id.to_string(), updated);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use serde_json::json;

    fn profile(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: None,
            education_level: "undergraduate".to_string(),
            specialization: "Python".to_string(),
            budget: 20.0,
            preferred_difficulty: Difficulty::Beginner,
            preferred_platform: None,
            quiz_score: None,
            embedding: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = InMemoryProfileStore::new();
        store.insert(profile("u1")).await;

        assert!(store.find_by_id("u1").await.unwrap().is_some());
        assert!(store.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_fields_merges_subset() {
        let store = InMemoryProfileStore::new();
        store.insert(profile("u1")).await;

        let mut fields = Map::new();
        fields.insert("quiz_score".to_string(), json!(8));
        fields.insert("budget".to_string(), json!(35.0));

        assert!(store.update_fields("u1", fields).await.unwrap());

        let updated = store.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(updated.quiz_score, Some(8));
        assert_eq!(updated.budget, 35.0);
        // Untouched fields survive the merge
        assert_eq!(updated.specialization, "Python");
    }

    #[tokio::test]
    async fn test_update_fields_missing_user() {
        let store = InMemoryProfileStore::new();
        assert!(!store.update_fields("nobody", Map::new()).await.unwrap());
    }
}
