use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    database::WellnessStore,
    dto::response_dto::{HistoryQuery, SubmitDailyRequest, TodayQuery, TodayResponse},
    error::{Error, Result},
    models::user::Caller,
    AppState,
};

pub async fn submit_daily<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<SubmitDailyRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state
        .submission_service
        .submit_daily_response(&caller, payload.quiz_id, &payload.answers)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn my_history<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse> {
    let history = state
        .submission_service
        .my_history(&caller, query.limit)
        .await?;
    Ok(Json(history))
}

pub async fn my_summary<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse> {
    let summary = state.submission_service.history_summary(&caller).await?;
    Ok(Json(summary))
}

pub async fn today<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<TodayQuery>,
) -> Result<impl IntoResponse> {
    caller.require_patient()?;
    let quiz_id = match query.quiz_id {
        Some(quiz_id) => quiz_id,
        None => {
            state
                .quiz_service
                .active_quiz()
                .await?
                .ok_or_else(|| Error::NotFound("No active quiz".to_string()))?
                .id
        }
    };
    let response = state
        .submission_service
        .today_response(&caller, quiz_id)
        .await?;
    Ok(Json(TodayResponse { quiz_id, response }))
}

pub async fn patient_history<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse> {
    let history = state
        .submission_service
        .patient_history(&caller, patient_id, query.limit)
        .await?;
    Ok(Json(history))
}
