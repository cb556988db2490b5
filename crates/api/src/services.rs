//! External service abstractions.
//!
//! Each service is abstracted behind a trait to enable mocking in tests.
//!
//! ## Services
//!
//! - **identity** - Session token verification via Unkey
//! - **generator** - Story text generation via an OpenAI-compatible API
//! - **firebase** - Custom tokens for the browser's storage SDK
//! - **unkey** / **openai** - Low-level HTTP clients used by the above
//!
//! ## Usage in Handlers
//!
//! Services are accessed via `AppState`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     let story = state.generator.generate(&words).await?;
//!     let token = state.storage_tokens.issue(&user.id)?;
//! }
//! ```

mod firebase;
mod generator;
mod http;
mod identity;
pub mod openai;
pub mod unkey;

pub use firebase::{FirebaseTokenIssuer, StorageTokenIssuer};
pub use generator::{OpenAiStoryGenerator, StoryGenerator};
pub use identity::{IdentityProvider, UnkeyIdentityProvider};

#[cfg(test)]
pub use firebase::MockStorageTokenIssuer;
#[cfg(test)]
pub use generator::MockStoryGenerator;
#[cfg(test)]
pub use identity::MockIdentityProvider;
