//! Error type and response handling shared by the outbound HTTP clients.

use serde::de::DeserializeOwned;

#[derive(Debug)]
pub enum Error {
    Request(String),
    Api { status: u16, message: String },
    Parse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Request(e) => write!(f, "request failed: {}", e),
            Error::Api { status, message } => write!(f, "API error {}: {}", status, message),
            Error::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

/// Fails with `Error::Api` on a non-2xx status, otherwise decodes the JSON body.
pub async fn json_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| Error::Parse(e.to_string()))
}
