//! Storage SDK token endpoint.
//!
//! The browser uses this token to sign in to Firebase with the same user id it
//! has here, so storage security rules can match on `request.auth.uid`.
//!
//! ## Endpoints
//!
//! - GET /api/getFirebaseToken - Mint a custom token for the signed-in user

use axum::{
    Json, Router, debug_handler, extract::State, response::IntoResponse, routing::get,
};
use shared::api::StorageTokenResponse;

use crate::{error::AppError, middleware::auth::AuthUser, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/getFirebaseToken", get(get_storage_token))
}

#[debug_handler]
async fn get_storage_token(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let token = state.storage_tokens.issue(&user.id)?;

    tracing::info!(user_id = %user.id, "storage token issued");

    Ok(Json(StorageTokenResponse {
        firebase_token: token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockStorageTokenIssuer;
    use crate::test_utils::{TestStateBuilder, response_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn returns_token_for_user() {
        let mut issuer = MockStorageTokenIssuer::new();
        issuer
            .expect_issue()
            .with(mockall::predicate::eq("user_2abc"))
            .times(1)
            .returning(|_| Ok("signed.jwt.token".to_string()));

        let state = TestStateBuilder::new().with_storage_tokens(issuer).build();

        let response = get_storage_token(
            AuthUser {
                id: "user_2abc".into(),
            },
            State(state),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "firebaseToken": "signed.jwt.token" })
        );
    }

    #[tokio::test]
    async fn signing_failure_is_internal_error() {
        let mut issuer = MockStorageTokenIssuer::new();
        issuer
            .expect_issue()
            .returning(|_| Err(anyhow::anyhow!("bad key")));

        let state = TestStateBuilder::new().with_storage_tokens(issuer).build();

        let result = get_storage_token(
            AuthUser {
                id: "user_2abc".into(),
            },
            State(state),
        )
        .await;

        let Err(err) = result else {
            panic!("Expected error");
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
