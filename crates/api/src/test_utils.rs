//! Shared test utilities for API handler tests.
//!
//! Provides common fixtures and a flexible `TestStateBuilder` for constructing
//! `AppState` instances with only the mocks needed for each test.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::test_utils::TestStateBuilder;
//!
//! let mut phonics = MockPhonicsRepo::new();
//! phonics.expect_find_by_sound().returning(|_| Ok(vec![]));
//!
//! let state = TestStateBuilder::new()
//!     .with_phonics_repo(phonics)
//!     .build();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;

use crate::config::Config;
use crate::models::StoredStory;
use crate::repos::{MockFavoriteRepo, MockPhonicsRepo, Repos};
use crate::services::{
    IdentityProvider, MockIdentityProvider, MockStorageTokenIssuer, MockStoryGenerator,
    StorageTokenIssuer, StoryGenerator,
};
use crate::state::AppState;
use crate::stores::{MockRateLimiter, MockStoryStore, RateLimitResult, StoryStore, Stores};

/// Creates a test configuration with dummy values.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        database_url: "postgres://test".to_string(),
        redis_url: "redis://test".to_string(),
        unkey_root_key: "test".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        firebase_client_email: "test@test.iam.gserviceaccount.com".to_string(),
        firebase_private_key: "test".to_string(),
        story_rate_limit_per_hour: 30,
        env: "test".to_string(),
        sentry_dsn: None,
    }
}

/// Creates a stored story with the given text, sounds and creation time.
pub fn mock_stored_story(story: &str, sounds: &[&str], created_at: DateTime<Utc>) -> StoredStory {
    StoredStory::new(
        story.to_string(),
        sounds.iter().map(|s| s.to_string()).collect(),
        created_at,
    )
}

/// Rate limiter that lets every request through.
pub fn allow_all_rate_limiter() -> MockRateLimiter {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_check()
        .returning(|_, _, _, _| Ok(RateLimitResult::Allowed(1)));
    limiter
}

/// Reads a response body as JSON.
pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// In-memory story store for tests that exercise several handlers in sequence.
#[derive(Clone, Default)]
pub struct InMemoryStoryStore {
    stories: Arc<Mutex<HashMap<String, Vec<StoredStory>>>>,
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn save(&self, user_id: &str, story: &StoredStory) -> Result<()> {
        let mut stories = self.stories.lock().unwrap();
        stories
            .entry(user_id.to_string())
            .or_default()
            .push(story.clone());
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<StoredStory>> {
        let stories = self.stories.lock().unwrap();
        let mut list = stories.get(user_id).cloned().unwrap_or_default();
        list.reverse();
        Ok(list)
    }

    async fn exists(&self, user_id: &str, story_id: &str) -> Result<bool> {
        let stories = self.stories.lock().unwrap();
        Ok(stories
            .get(user_id)
            .is_some_and(|list| list.iter().any(|s| s.id == story_id)))
    }

    async fn delete(&self, user_id: &str, story_id: &str) -> Result<bool> {
        let mut stories = self.stories.lock().unwrap();
        let Some(list) = stories.get_mut(user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|s| s.id != story_id);
        Ok(list.len() < before)
    }
}

/// Builder for constructing test `AppState` with custom mocks.
///
/// Uses default (empty) mocks for any repo/store/service not explicitly set.
/// This allows tests to only configure the mocks they actually need.
pub struct TestStateBuilder {
    phonics_repo: Option<MockPhonicsRepo>,
    favorite_repo: Option<MockFavoriteRepo>,
    story_store: Option<Arc<dyn StoryStore>>,
    rate_limiter: Option<MockRateLimiter>,
    identity: Option<MockIdentityProvider>,
    generator: Option<MockStoryGenerator>,
    storage_tokens: Option<MockStorageTokenIssuer>,
}

impl TestStateBuilder {
    /// Creates a new builder with no mocks configured.
    pub fn new() -> Self {
        Self {
            phonics_repo: None,
            favorite_repo: None,
            story_store: None,
            rate_limiter: None,
            identity: None,
            generator: None,
            storage_tokens: None,
        }
    }

    pub fn with_phonics_repo(mut self, repo: MockPhonicsRepo) -> Self {
        self.phonics_repo = Some(repo);
        self
    }

    pub fn with_favorite_repo(mut self, repo: MockFavoriteRepo) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    /// Accepts a `MockStoryStore` or an `InMemoryStoryStore`.
    pub fn with_story_store(mut self, store: impl StoryStore + 'static) -> Self {
        self.story_store = Some(Arc::new(store));
        self
    }

    pub fn with_rate_limiter(mut self, limiter: MockRateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_identity(mut self, identity: MockIdentityProvider) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_generator(mut self, generator: MockStoryGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_storage_tokens(mut self, issuer: MockStorageTokenIssuer) -> Self {
        self.storage_tokens = Some(issuer);
        self
    }

    /// Builds the `AppState` using configured mocks or defaults.
    pub fn build(self) -> AppState {
        let repos = Repos {
            phonics: Arc::new(self.phonics_repo.unwrap_or_else(MockPhonicsRepo::new)),
            favorites: Arc::new(self.favorite_repo.unwrap_or_else(default_favorite_repo)),
        };

        let stores = Stores {
            stories: self
                .story_store
                .unwrap_or_else(|| Arc::new(MockStoryStore::new()) as Arc<dyn StoryStore>),
            rate_limiter: Arc::new(self.rate_limiter.unwrap_or_else(MockRateLimiter::new)),
        };

        let identity = Arc::new(self.identity.unwrap_or_else(MockIdentityProvider::new))
            as Arc<dyn IdentityProvider>;
        let generator = Arc::new(self.generator.unwrap_or_else(MockStoryGenerator::new))
            as Arc<dyn StoryGenerator>;
        let storage_tokens = Arc::new(
            self.storage_tokens
                .unwrap_or_else(MockStorageTokenIssuer::new),
        ) as Arc<dyn StorageTokenIssuer>;

        AppState {
            config: test_config(),
            repos,
            stores,
            identity,
            generator,
            storage_tokens,
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a default favorites mock with no favorites and no-op deletes.
fn default_favorite_repo() -> MockFavoriteRepo {
    let mut repo = MockFavoriteRepo::new();
    repo.expect_favorite_ids().returning(|_| Ok(vec![]));
    repo.expect_delete().returning(|_, _| Ok(()));
    repo
}
