//! Story blob storage for Redis.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::Deserialize;

use crate::models::StoredStory;

/// Store for a user's story blobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Health check - verify Redis connectivity.
    async fn health_check(&self) -> Result<bool>;

    /// Store a story blob and add it to the owner's index.
    async fn save(&self, user_id: &str, story: &StoredStory) -> Result<()>;

    /// All stories of a user, in index order (newest first).
    async fn list(&self, user_id: &str) -> Result<Vec<StoredStory>>;

    /// Whether a story exists in the user's namespace.
    async fn exists(&self, user_id: &str, story_id: &str) -> Result<bool>;

    /// Delete a story (returns true if the blob existed).
    async fn delete(&self, user_id: &str, story_id: &str) -> Result<bool>;
}

/// Redis implementation of StoryStore.
#[derive(Clone)]
pub struct RedisStoryStore {
    client: redis::Client,
}

impl RedisStoryStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn index_key(user_id: &str) -> String {
        format!("users:{}:stories", user_id)
    }

    fn story_key(user_id: &str, story_id: &str) -> String {
        format!("users:{}:stories:{}", user_id, story_id)
    }
}

/// Blob contents as read back. Older blobs carry only `story` and `sounds`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryBlob {
    story: String,
    #[serde(default)]
    sounds: Vec<String>,
    created_at: Option<DateTime<Utc>>,
}

/// Decodes a stored blob. A missing creation time falls back to the index
/// score. Blobs that are not story JSON are returned with the raw text as
/// the story.
fn decode_story(id: String, raw: String, score_millis: f64) -> StoredStory {
    let indexed_at =
        DateTime::<Utc>::from_timestamp_millis(score_millis as i64).unwrap_or_default();

    match serde_json::from_str::<StoryBlob>(&raw) {
        Ok(blob) => StoredStory {
            id,
            story: blob.story,
            sounds: blob.sounds,
            created_at: blob.created_at.unwrap_or(indexed_at),
        },
        Err(e) => {
            tracing::warn!(story_id = %id, error = %e, "unparseable story blob, returning raw text");
            StoredStory {
                id,
                story: raw,
                sounds: Vec::new(),
                created_at: indexed_at,
            }
        }
    }
}

#[async_trait]
impl StoryStore for RedisStoryStore {
    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }

    async fn save(&self, user_id: &str, story: &StoredStory) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(story)?;
        let score = story.created_at.timestamp_millis() as f64;

        let _: () = redis::pipe()
            .atomic()
            .set(Self::story_key(user_id, &story.id), json)
            .ignore()
            .zadd(Self::index_key(user_id), &story.id, score)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<StoredStory>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let entries: Vec<(String, f64)> = conn
            .zrevrange_withscores(Self::index_key(user_id), 0, -1)
            .await?;

        let mut stories = Vec::with_capacity(entries.len());

        // Index entries whose blob is gone are skipped
        for (id, score) in entries {
            let raw: Option<String> = conn.get(Self::story_key(user_id, &id)).await?;
            if let Some(raw) = raw {
                stories.push(decode_story(id, raw, score));
            }
        }

        Ok(stories)
    }

    async fn exists(&self, user_id: &str, story_id: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let exists: bool = conn.exists(Self::story_key(user_id, story_id)).await?;
        Ok(exists)
    }

    async fn delete(&self, user_id: &str, story_id: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let deleted: i64 = conn.del(Self::story_key(user_id, story_id)).await?;
        let _: () = conn.zrem(Self::index_key(user_id), story_id).await?;

        Ok(deleted > 0)
    }
}
