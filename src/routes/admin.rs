use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    database::WellnessStore,
    dto::quiz_dto::{
        CreateQuestionPayload, CreateQuizPayload, ReplaceScoringRulesPayload,
        UpdateQuestionPayload,
    },
    error::Result,
    models::user::Caller,
    AppState,
};

pub async fn list_quizzes<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse> {
    let quizzes = state.quiz_service.list_quizzes(&caller).await?;
    Ok(Json(quizzes))
}

pub async fn get_quiz<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get_quiz(&caller, id).await?;
    Ok(Json(quiz))
}

pub async fn create_quiz<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.create_quiz(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn activate_quiz<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.activate_quiz(&caller, id).await?;
    Ok(Json(quiz))
}

pub async fn add_question<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    let question = state
        .quiz_service
        .add_question(&caller, quiz_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    let question = state
        .quiz_service
        .update_question(&caller, id, payload)
        .await?;
    Ok(Json(question))
}

pub async fn delete_question<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_question(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn replace_scoring_rules<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<ReplaceScoringRulesPayload>,
) -> Result<impl IntoResponse> {
    let rules = state
        .quiz_service
        .replace_scoring_rules(&caller, quiz_id, payload)
        .await?;
    Ok(Json(rules))
}
