//! Session verification abstraction wrapping Unkey.

use anyhow::Result;
use async_trait::async_trait;

use super::unkey;

/// Resolves a bearer token to the user it was issued to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the user id for a valid token, `None` if the token is rejected.
    async fn verify(&self, token: &str) -> Result<Option<String>>;
}

/// Unkey implementation of IdentityProvider.
pub struct UnkeyIdentityProvider {
    client: unkey::Client,
}

impl UnkeyIdentityProvider {
    pub fn new(client: unkey::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for UnkeyIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Option<String>> {
        let response = self
            .client
            .verify_key(token)
            .await
            .map_err(|e| anyhow::anyhow!("Unkey verification failed: {}", e))?;

        Ok(response.user_id())
    }
}
