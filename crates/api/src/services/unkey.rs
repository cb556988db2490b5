//! Unkey API client used to verify session keys.
//!
//! Uses the v2 API: https://www.unkey.com/docs/api-reference

use serde::{Deserialize, Serialize};

use super::http::{Error, json_response};

const VERIFY_KEY_URL: &str = "https://api.unkey.com/v2/keys.verifyKey";

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    root_key: String,
}

impl Client {
    pub fn new(root_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            root_key: root_key.into(),
        }
    }

    /// Verify a key. The root key determines which API it is checked against.
    pub async fn verify_key(&self, key: &str) -> Result<VerifyKeyResponse, Error> {
        let response = self
            .http
            .post(VERIFY_KEY_URL)
            .bearer_auth(&self.root_key)
            .json(&VerifyKeyRequest { key })
            .send()
            .await?;

        let wrapper: ApiResponse<VerifyKeyResponse> = json_response(response).await?;
        Ok(wrapper.data)
    }
}

#[derive(Serialize)]
struct VerifyKeyRequest<'a> {
    key: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
pub struct VerifyKeyResponse {
    pub valid: bool,
    pub identity: Option<Identity>,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    #[serde(rename = "externalId")]
    pub external_id: String,
}

impl VerifyKeyResponse {
    /// The owning user id, only for keys Unkey reports as valid.
    pub fn user_id(self) -> Option<String> {
        if !self.valid {
            return None;
        }
        self.identity
            .map(|i| i.external_id)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VerifyKeyResponse {
        serde_json::from_str::<ApiResponse<VerifyKeyResponse>>(json)
            .unwrap()
            .data
    }

    #[test]
    fn valid_key_yields_external_id() {
        let response = parse(r#"{"data":{"valid":true,"identity":{"externalId":"user_2abc"}}}"#);
        assert_eq!(response.user_id().as_deref(), Some("user_2abc"));
    }

    #[test]
    fn invalid_key_yields_nothing() {
        let response = parse(r#"{"data":{"valid":false,"identity":{"externalId":"user_2abc"}}}"#);
        assert_eq!(response.user_id(), None);
    }

    #[test]
    fn key_without_identity_yields_nothing() {
        let response = parse(r#"{"data":{"valid":true}}"#);
        assert_eq!(response.user_id(), None);
    }
}
