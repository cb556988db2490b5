//! Word bank lookup.
//!
//! Public endpoint exposing the raw phonics table rows for one sound, used by
//! the client to preview which words a sound will draw from.
//!
//! ## Endpoints
//!
//! - GET /api/wordbank?sound= - Rows of the phonics table for a sound

use axum::{
    Json, Router, debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use shared::api::{WordbankEntry, WordbankQuery};

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/wordbank", get(get_wordbank))
}

#[debug_handler]
async fn get_wordbank(
    State(state): State<AppState>,
    Query(query): Query<WordbankQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sound = query
        .sound
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::External(
            StatusCode::BAD_REQUEST,
            "Sound parameter is required",
        ))?;

    let rows = state.repos.phonics.find_by_sound(&sound).await?;
    if rows.is_empty() {
        return Err(AppError::External(
            StatusCode::NOT_FOUND,
            "No data found for this sound",
        ));
    }

    let entries: Vec<WordbankEntry> = rows.into_iter().map(Into::into).collect();

    Ok(Json(entries))
}
