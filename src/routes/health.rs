use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{database::WellnessStore, AppState};

/// Liveness plus whether patients currently have a quiz to answer. Reports `degraded` with
/// 503 when the store cannot be read.
pub async fn health<S: WellnessStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let (status, label, active_quiz_id) = match state.quiz_service.active_quiz().await {
        Ok(quiz) => (StatusCode::OK, "ok", quiz.map(|quiz| quiz.id)),
        Err(err) => {
            tracing::warn!(error = %err, "health check could not read the active quiz");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };

    let body = json!({
        "status": label,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "active_quiz_id": active_quiz_id,
    });
    (status, Json(body))
}
