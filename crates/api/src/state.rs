use std::sync::Arc;

use crate::{
    config::Config,
    repos::Repos,
    services::{IdentityProvider, StorageTokenIssuer, StoryGenerator},
    stores::Stores,
};

#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Relational repositories (PostgreSQL).
    pub repos: Repos,
    /// Story blobs and counters (Redis).
    pub stores: Stores,
    /// Session verification (Unkey).
    pub identity: Arc<dyn IdentityProvider>,
    /// Story text generation (OpenAI).
    pub generator: Arc<dyn StoryGenerator>,
    /// Storage SDK token minting (Firebase).
    pub storage_tokens: Arc<dyn StorageTokenIssuer>,
}
