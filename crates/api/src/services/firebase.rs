//! Firebase custom tokens for the browser's storage SDK.
//!
//! A custom token is an RS256 JWT signed with a service account key. The
//! browser exchanges it for a Firebase ID token carrying `uid`.
//! See https://firebase.google.com/docs/auth/admin/create-custom-tokens

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

const AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";
/// Firebase rejects custom tokens valid for longer than an hour.
const TOKEN_TTL_SECS: i64 = 3600;

/// Mints tokens the client uses to talk to the storage SDK directly.
#[cfg_attr(test, mockall::automock)]
pub trait StorageTokenIssuer: Send + Sync {
    fn issue(&self, user_id: &str) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct CustomTokenClaims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    uid: String,
}

fn custom_token_claims(client_email: &str, user_id: &str, now: DateTime<Utc>) -> CustomTokenClaims {
    let iat = now.timestamp();
    CustomTokenClaims {
        iss: client_email.to_string(),
        sub: client_email.to_string(),
        aud: AUDIENCE.to_string(),
        iat,
        exp: iat + TOKEN_TTL_SECS,
        uid: user_id.to_string(),
    }
}

/// Signs custom tokens with a service account key.
pub struct FirebaseTokenIssuer {
    client_email: String,
    key: EncodingKey,
}

impl FirebaseTokenIssuer {
    pub fn new(client_email: impl Into<String>, private_key_pem: &str) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("invalid Firebase service account private key")?;

        Ok(Self {
            client_email: client_email.into(),
            key,
        })
    }
}

impl StorageTokenIssuer for FirebaseTokenIssuer {
    fn issue(&self, user_id: &str) -> Result<String> {
        let claims = custom_token_claims(&self.client_email, user_id, Utc::now());
        let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .context("failed to sign Firebase custom token")?;
        Ok(token)
    }
}
