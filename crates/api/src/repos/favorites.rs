//! Story favorite flags for PostgreSQL.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::models::Favorite;

/// Repository for per-user story favorites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepo: Send + Sync {
    /// Flip the favorite flag of a story. A story without a row counts as
    /// not favorited, so the first toggle marks it as favorite.
    async fn toggle(&self, user_id: &str, story_id: &str) -> Result<Favorite>;

    /// IDs of the user's stories currently marked as favorite.
    async fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>>;

    /// Remove a story's favorite row, if any.
    async fn delete(&self, user_id: &str, story_id: &str) -> Result<()>;
}

/// PostgreSQL implementation of FavoriteRepo.
#[derive(Clone)]
pub struct PgFavoriteRepo {
    pool: Pool<Postgres>,
}

impl PgFavoriteRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepo for PgFavoriteRepo {
    async fn toggle(&self, user_id: &str, story_id: &str) -> Result<Favorite> {
        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO story_favorites (user_id, story_id, is_favorite)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (user_id, story_id) DO UPDATE
            SET is_favorite = NOT story_favorites.is_favorite, updated_at = now()
            RETURNING user_id, story_id, is_favorite, updated_at
            "#,
        )
        .bind(user_id)
        .bind(story_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(favorite)
    }

    async fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT story_id FROM story_favorites WHERE user_id = $1 AND is_favorite",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn delete(&self, user_id: &str, story_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM story_favorites WHERE user_id = $1 AND story_id = $2")
            .bind(user_id)
            .bind(story_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
