use axum::{extract::State, http::StatusCode, Json};

use crate::dto::HealthResponse;
use crate::web::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok".into() })),
        Err(err) => {
            tracing::warn!(error = %err, "storage ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "unavailable".into() }),
            )
        }
    }
}
