//! Saved story endpoints.
//!
//! ## Storage
//!
//! - Story text and sounds are stored as an immutable JSON blob in Redis,
//!   under the owner's namespace (see `stores`)
//! - The favorite flag lives in PostgreSQL and is joined in when listing
//! - Story ids from clients are validated before they are used in a key
//!
//! ## Endpoints
//!
//! - POST /api/saveStory - Save a generated story
//! - GET /api/getStories - List the user's stories, newest first (optional `?sound=`)
//! - DELETE /api/deleteStory?id= - Delete a story and its favorite flag
//! - POST /api/toggleFavorite?id= - Flip a story's favorite flag

use std::collections::HashSet;

use axum::{
    Json, Router, debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use garde::Validate;
use shared::api::{
    MessageResponse, SaveStoryPayload, SaveStoryResponse, StoriesQuery, StoriesResponse, Story,
    StoryIdQuery, ToggleFavoriteResponse, check_sounds, is_valid_story_id,
};

use crate::{error::AppError, middleware::auth::AuthUser, models::StoredStory, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/saveStory", post(save_story))
        .route("/getStories", get(list_stories))
        .route("/deleteStory", delete(delete_story))
        .route("/toggleFavorite", post(toggle_favorite))
}

/// Extracts a usable story id from `?id=`.
fn require_story_id(query: StoryIdQuery) -> Result<String, AppError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::External(
            StatusCode::BAD_REQUEST,
            "No story ID provided",
        ))?;

    if !is_valid_story_id(&id) {
        return Err(AppError::Validation("id: malformed story id".into()));
    }

    Ok(id)
}

#[debug_handler]
async fn save_story(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SaveStoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sounds = payload.sounds();
    if payload.story.trim().is_empty() || sounds.is_empty() {
        return Err(AppError::External(
            StatusCode::BAD_REQUEST,
            "No story or sounds provided",
        ));
    }

    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    check_sounds(&sounds).map_err(AppError::Validation)?;

    let story = StoredStory::new(payload.story, sounds, Utc::now());
    state.stores.stories.save(&user.id, &story).await?;

    tracing::info!(user_id = %user.id, story_id = %story.id, "story saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveStoryResponse {
            message: "Story saved successfully".to_string(),
            id: story.id,
        }),
    ))
}

#[debug_handler]
async fn list_stories(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state.stores.stories.list(&user.id).await?;
    let favorites: HashSet<String> = state
        .repos
        .favorites
        .favorite_ids(&user.id)
        .await?
        .into_iter()
        .collect();

    let sound = query
        .sound
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut stories: Vec<Story> = stored
        .into_iter()
        .filter(|story| sound.as_ref().is_none_or(|s| story.sounds.contains(s)))
        .map(|story| {
            let is_favorite = favorites.contains(&story.id);
            story.into_story(is_favorite)
        })
        .collect();

    stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(StoriesResponse { stories }))
}

#[debug_handler]
async fn delete_story(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StoryIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = require_story_id(query)?;

    let deleted = state.stores.stories.delete(&user.id, &id).await?;
    if !deleted {
        return Err(AppError::External(StatusCode::NOT_FOUND, "Story not found"));
    }

    state.repos.favorites.delete(&user.id, &id).await?;

    tracing::info!(user_id = %user.id, story_id = %id, "story deleted");

    Ok(Json(MessageResponse {
        message: "Story deleted successfully".to_string(),
    }))
}

#[debug_handler]
async fn toggle_favorite(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StoryIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = require_story_id(query)?;

    // Only stories in the caller's own namespace can be favorited
    if !state.stores.stories.exists(&user.id, &id).await? {
        return Err(AppError::External(StatusCode::NOT_FOUND, "Story not found"));
    }

    let favorite = state.repos.favorites.toggle(&user.id, &id).await?;

    tracing::info!(
        user_id = %user.id,
        story_id = %id,
        is_favorite = favorite.is_favorite,
        "favorite toggled"
    );

    Ok(Json(ToggleFavoriteResponse {
        success: true,
        story: favorite.into(),
    }))
}
