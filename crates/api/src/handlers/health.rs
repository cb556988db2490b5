//! Health check endpoint for load balancers and monitoring.
//!
//! Returns 200 OK if the service is healthy (database and Redis reachable),
//! 503 Service Unavailable otherwise.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
    redis: bool,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state
        .repos
        .phonics
        .health_check()
        .await
        .unwrap_or(false);

    let redis_ok = state
        .stores
        .stories
        .health_check()
        .await
        .unwrap_or(false);

    let healthy = db_ok && redis_ok;

    let response = HealthResponse {
        status: if healthy { "ok" } else { "unhealthy" },
        database: db_ok,
        redis: redis_ok,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::MockPhonicsRepo;
    use crate::stores::MockStoryStore;
    use crate::test_utils::{TestStateBuilder, response_json};

    /// `None` makes the corresponding health check fail with an error.
    fn state(db: Option<bool>, redis: Option<bool>) -> AppState {
        let mut phonics = MockPhonicsRepo::new();
        phonics
            .expect_health_check()
            .returning(move || db.ok_or_else(|| anyhow::anyhow!("connection refused")));

        let mut stories = MockStoryStore::new();
        stories
            .expect_health_check()
            .returning(move || redis.ok_or_else(|| anyhow::anyhow!("connection refused")));

        TestStateBuilder::new()
            .with_phonics_repo(phonics)
            .with_story_store(stories)
            .build()
    }

    #[tokio::test]
    async fn healthy_when_both_backends_answer() {
        let response = health_check(State(state(Some(true), Some(true))))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "status": "ok", "database": true, "redis": true })
        );
    }

    #[tokio::test]
    async fn unhealthy_when_redis_fails() {
        let response = health_check(State(state(Some(true), None)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response_json(response).await["redis"], false);
    }

    #[tokio::test]
    async fn unhealthy_when_database_fails() {
        let response = health_check(State(state(Some(false), Some(true))))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response_json(response).await["database"], false);
    }
}
