use axum::{extract::State, response::IntoResponse, Json};

use crate::{database::WellnessStore, dto::quiz_dto::QuizView, error::Result, AppState};

/// `null` when no quiz is active and bootstrapping is disabled.
pub async fn get_active_quiz<S: WellnessStore>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.active_quiz().await?;
    Ok(Json(quiz.as_deref().map(QuizView::from)))
}
