use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    database::WellnessStore,
    dto::exercise_dto::{CreateExercisePayload, ExerciseQuery, UpdateExercisePayload},
    error::Result,
    models::user::Caller,
    AppState,
};

pub async fn list_exercises<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ExerciseQuery>,
) -> Result<impl IntoResponse> {
    let exercises = state.exercise_service.list(query.intensity).await?;
    Ok(Json(exercises))
}

pub async fn create_exercise<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateExercisePayload>,
) -> Result<impl IntoResponse> {
    let exercise = state.exercise_service.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update_exercise<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExercisePayload>,
) -> Result<impl IntoResponse> {
    let exercise = state.exercise_service.update(&caller, id, payload).await?;
    Ok(Json(exercise))
}

pub async fn delete_exercise<S: WellnessStore>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.exercise_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
