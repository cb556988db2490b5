//! Story generation endpoint.
//!
//! Flow:
//! 1. Normalize the requested sounds (list or single-sound form, comma-separated allowed)
//! 2. Count the request against the user's hourly generation limit
//! 3. Look up matching words in the phonics table, flattened in sound order
//! 4. Ask the story generator for a short story using those words
//!
//! When no word in the table matches, the sounds themselves are sent to the
//! generator so the user still gets a story.
//!
//! ## Endpoints
//!
//! - POST /api/story - Generate a story for `{sounds}` or `{sound}`

use axum::{
    Json, Router, debug_handler, extract::State, http::StatusCode, response::IntoResponse,
    routing::post,
};
use garde::Validate;
use shared::api::{StoryPayload, StoryResponse, check_sounds};

use crate::{error::AppError, middleware::auth::AuthUser, state::AppState};

const RATE_LIMIT_SCOPE: &str = "story";
const RATE_LIMIT_WINDOW_SECS: u64 = 60 * 60;

pub fn router() -> Router<AppState> {
    Router::new().route("/story", post(generate_story))
}

/// Drops repeated words, keeping the first occurrence.
fn dedup_words(words: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        if !unique.contains(&word) {
            unique.push(word);
        }
    }
    unique
}

#[debug_handler]
async fn generate_story(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<StoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let sounds = payload.sounds();
    if sounds.is_empty() {
        return Err(AppError::External(
            StatusCode::BAD_REQUEST,
            "No sounds provided",
        ));
    }
    check_sounds(&sounds).map_err(AppError::Validation)?;

    let limit = state
        .stores
        .rate_limiter
        .check(
            RATE_LIMIT_SCOPE,
            &user.id,
            state.config.story_rate_limit_per_hour,
            RATE_LIMIT_WINDOW_SECS,
        )
        .await?;

    if !limit.is_allowed() {
        return Err(AppError::External(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many stories requested, try again later",
        ));
    }

    let matched = state
        .repos
        .phonics
        .words_for_sounds(&sounds)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, "phonics lookup failed: {:?}", e);
            AppError::External(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate story")
        })?;

    let mut words = dedup_words(matched);
    if words.is_empty() {
        tracing::info!(user_id = %user.id, sounds = ?sounds, "no words matched, using sounds");
        words = sounds.clone();
    }

    let story = state.generator.generate(&words).await.map_err(|e| {
        tracing::error!(user_id = %user.id, "story generation failed: {:?}", e);
        AppError::External(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate story")
    })?;

    tracing::info!(
        user_id = %user.id,
        sound_count = sounds.len(),
        word_count = words.len(),
        "story generated"
    );

    Ok(Json(StoryResponse { story }))
}
