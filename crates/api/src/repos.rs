//! Database repositories (PostgreSQL).
//!
//! Each repository is abstracted behind a trait to enable mocking in tests.
//!
//! ## Repositories
//!
//! - **phonics** - Read-only sound → word lookup table
//! - **favorites** - Per-user favorite flags for saved stories
//!
//! ## Usage in Handlers
//!
//! Repositories are accessed via `state.repos`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     let words = state.repos.phonics.words_for_sounds(&sounds).await?;
//!     let favorite = state.repos.favorites.toggle(&user.id, &story_id).await?;
//! }
//! ```

mod favorites;
mod phonics;

pub use favorites::{FavoriteRepo, PgFavoriteRepo};
pub use phonics::{PgPhonicsRepo, PhonicsRepo};

#[cfg(test)]
pub use favorites::MockFavoriteRepo;
#[cfg(test)]
pub use phonics::MockPhonicsRepo;

use std::sync::Arc;

/// Collection of all database repositories.
#[derive(Clone)]
pub struct Repos {
    pub phonics: Arc<dyn PhonicsRepo>,
    pub favorites: Arc<dyn FavoriteRepo>,
}
