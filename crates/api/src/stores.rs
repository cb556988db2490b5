//! Key-value stores (Redis).
//!
//! Story blobs play the role of an object store: one JSON document per story,
//! namespaced by the owning user, plus a per-user sorted set used to
//! enumerate them.
//!
//! ## Stores
//!
//! - **stories** - Story blobs and the per-user index
//! - **rate_limit** - Windowed counters for story generation
//!
//! ## Redis Key Patterns
//!
//! ```text
//! users:{user_id}:stories:{story_id}   → StoredStory JSON
//! users:{user_id}:stories              → Sorted set of story IDs (score = created_at millis)
//! ratelimit:{scope}:{user_id}          → Request count (expires with the window)
//! ```
//!
//! ## Usage in Handlers
//!
//! ```ignore
//! async fn handler(user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     state.stores.stories.save(&user.id, &story).await?;
//!     let stories = state.stores.stories.list(&user.id).await?;
//! }
//! ```

mod rate_limit;
mod stories;

pub use rate_limit::{RateLimitResult, RateLimiter, RedisRateLimiter};
pub use stories::{RedisStoryStore, StoryStore};

#[cfg(test)]
pub use rate_limit::MockRateLimiter;
#[cfg(test)]
pub use stories::MockStoryStore;

use std::sync::Arc;

/// Collection of all Redis-backed stores.
#[derive(Clone)]
pub struct Stores {
    pub stories: Arc<dyn StoryStore>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}
