//! Phonics word table for PostgreSQL.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::models::PhonicsWord;

/// Repository for the sound → word lookup table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhonicsRepo: Send + Sync {
    /// Health check - verify database connectivity.
    async fn health_check(&self) -> Result<bool>;

    /// All rows for a single sound.
    async fn find_by_sound(&self, sound: &str) -> Result<Vec<PhonicsWord>>;

    /// Words for several sounds, flattened in the order the sounds were given.
    async fn words_for_sounds(&self, sounds: &[String]) -> Result<Vec<String>>;
}

/// PostgreSQL implementation of PhonicsRepo.
#[derive(Clone)]
pub struct PgPhonicsRepo {
    pool: Pool<Postgres>,
}

impl PgPhonicsRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhonicsRepo for PgPhonicsRepo {
    async fn health_check(&self) -> Result<bool> {
        let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(result == 1)
    }

    async fn find_by_sound(&self, sound: &str) -> Result<Vec<PhonicsWord>> {
        let rows = sqlx::query_as::<_, PhonicsWord>(
            "SELECT id, sound, word FROM phonics WHERE sound = $1 ORDER BY id",
        )
        .bind(sound)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn words_for_sounds(&self, sounds: &[String]) -> Result<Vec<String>> {
        let words = sqlx::query_scalar::<_, String>(
            r#"
            SELECT word FROM phonics
            WHERE sound = ANY($1)
            ORDER BY array_position($1, sound), id
            "#,
        )
        .bind(sounds)
        .fetch_all(&self.pool)
        .await?;
        Ok(words)
    }
}
