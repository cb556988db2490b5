//! Shared API request/response types for the Phonicsville server and its clients.
//!
//! Field names follow the web client's JSON contract (camelCase where the
//! browser expects it, e.g. `createdAt`, `firebaseToken`).

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// Max sounds accepted in one request (after splitting comma-separated input).
pub const MAX_SOUNDS: usize = 20;
/// Max length of a single normalized sound.
pub const MAX_SOUND_LEN: usize = 16;
/// Max length of a single raw sound entry as submitted.
const MAX_SOUND_INPUT_LEN: usize = 64;
/// Generated stories are four sentences; this is a generous ceiling.
const MAX_STORY_LEN: usize = 10_000;
/// Max length of a story id accepted from clients.
const MAX_STORY_ID_LEN: usize = 128;

/// Parses comma-separated phonics sounds as typed into the generator form.
///
/// Entries are trimmed and lowercased, empty entries are dropped, and
/// duplicates are removed keeping the first occurrence.
///
/// ```
/// use shared::api::parse_sounds;
///
/// assert_eq!(parse_sounds(" SH, ch,,sh "), vec!["sh", "ch"]);
/// ```
pub fn parse_sounds(input: &str) -> Vec<String> {
    let mut sounds = Vec::new();
    push_sounds(&mut sounds, input);
    sounds
}

fn push_sounds(sounds: &mut Vec<String>, input: &str) {
    for part in input.split(',') {
        let sound = part.trim().to_lowercase();
        if !sound.is_empty() && !sounds.contains(&sound) {
            sounds.push(sound);
        }
    }
}

fn normalize_sounds<'a>(entries: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut sounds = Vec::new();
    for entry in entries {
        push_sounds(&mut sounds, entry);
    }
    sounds
}

/// Checks normalized sounds against the per-request limits.
///
/// Returns a field-prefixed message suitable for a validation error.
pub fn check_sounds(sounds: &[String]) -> Result<(), String> {
    if sounds.len() > MAX_SOUNDS {
        return Err(format!("sounds: at most {} sounds per request", MAX_SOUNDS));
    }
    if sounds.iter().any(|s| s.chars().count() > MAX_SOUND_LEN) {
        return Err(format!(
            "sounds: each sound must be at most {} characters",
            MAX_SOUND_LEN
        ));
    }
    Ok(())
}

/// Story ids are generated server-side as `<unix millis>-<hex>`. Anything a
/// client sends back must stay within that alphabet so it cannot address a
/// key outside the caller's namespace.
pub fn is_valid_story_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_STORY_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Request a new story for one or more phonics sounds.
///
/// Accepts either `{"sounds": ["sh", "ch"]}` or `{"sound": "sh"}`; entries
/// may themselves be comma-separated.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct StoryPayload {
    #[garde(length(max = MAX_SOUNDS), inner(length(max = MAX_SOUND_INPUT_LEN)))]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sounds: Vec<String>,
    #[garde(length(max = MAX_SOUND_INPUT_LEN))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sound: String,
}

impl StoryPayload {
    /// All requested sounds, normalized and de-duplicated.
    pub fn sounds(&self) -> Vec<String> {
        normalize_sounds(self.sounds.iter().chain(std::iter::once(&self.sound)))
    }
}

/// Returned after a story was generated.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
}

/// Save a generated story for the signed-in user.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct SaveStoryPayload {
    #[garde(length(max = MAX_STORY_LEN))]
    #[serde(default)]
    pub story: String,
    #[garde(length(max = MAX_SOUNDS), inner(length(max = MAX_SOUND_INPUT_LEN)))]
    #[serde(default)]
    pub sounds: Vec<String>,
}

impl SaveStoryPayload {
    /// Sounds to store with the story, normalized like generation requests.
    pub fn sounds(&self) -> Vec<String> {
        normalize_sounds(&self.sounds)
    }
}

/// Returned after saving a story.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveStoryResponse {
    pub message: String,
    pub id: String,
}

/// A saved story as listed for its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Storage id, unique within the owner's namespace.
    pub id: String,
    pub story: String,
    pub sounds: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Response from the story listing endpoint, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoriesResponse {
    pub stories: Vec<Story>,
}

/// Query parameters for the story listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoriesQuery {
    /// Only return stories generated for this sound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// `?id=` query used by delete and favorite toggling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryIdQuery {
    pub id: Option<String>,
}

/// Generic `{message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Favorite flag of a story after toggling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteState {
    pub story_id: String,
    pub is_favorite: bool,
    pub updated_at: DateTime<Utc>,
}

/// Returned after toggling a favorite.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
    pub success: bool,
    pub story: FavoriteState,
}

/// `?sound=` query for the word bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordbankQuery {
    pub sound: Option<String>,
}

/// One row of the phonics word table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordbankEntry {
    pub id: i64,
    pub sound: String,
    pub word: String,
}

/// Token the browser exchanges with the storage SDK.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageTokenResponse {
    pub firebase_token: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
