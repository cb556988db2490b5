use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::api::{FavoriteState, Story, WordbankEntry};
use sqlx::FromRow;

/// One row of the `phonics` word table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PhonicsWord {
    pub id: i64,
    pub sound: String,
    pub word: String,
}

impl From<PhonicsWord> for WordbankEntry {
    fn from(row: PhonicsWord) -> Self {
        Self {
            id: row.id,
            sound: row.sound,
            word: row.word,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: String,
    pub story_id: String,
    pub is_favorite: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteState {
    fn from(row: Favorite) -> Self {
        Self {
            story_id: row.story_id,
            is_favorite: row.is_favorite,
            updated_at: row.updated_at,
        }
    }
}

/// Story blob as stored in Redis.
///
/// Blobs are immutable once written. The favorite flag is kept in PostgreSQL
/// and joined in when listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStory {
    pub id: String,
    pub story: String,
    #[serde(default)]
    pub sounds: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredStory {
    /// Builds a story with a fresh id of the form `<unix millis>-<uuid hex>`.
    /// The random suffix keeps same-millisecond saves from colliding.
    pub fn new(story: String, sounds: Vec<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: format!(
                "{}-{}",
                created_at.timestamp_millis(),
                uuid::Uuid::new_v4().simple()
            ),
            story,
            sounds,
            created_at,
        }
    }

    pub fn into_story(self, is_favorite: bool) -> Story {
        Story {
            id: self.id,
            story: self.story,
            sounds: self.sounds,
            created_at: self.created_at,
            is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::api::is_valid_story_id;

    #[test]
    fn new_story_id_is_timestamp_prefixed() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let story = StoredStory::new("A cat.".into(), vec!["at".into()], created_at);

        assert!(
            story
                .id
                .starts_with(&format!("{}-", created_at.timestamp_millis()))
        );
        assert!(is_valid_story_id(&story.id));
    }

    #[test]
    fn same_millisecond_ids_differ() {
        let now = Utc::now();
        let a = StoredStory::new("a".into(), vec![], now);
        let b = StoredStory::new("b".into(), vec![], now);

        assert_ne!(a.id, b.id);
    }
}
