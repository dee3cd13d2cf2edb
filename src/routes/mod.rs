pub mod admin;
pub mod exercises;
pub mod health;
pub mod quizzes;
pub mod responses;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::config::Config;
use crate::database::WellnessStore;
use crate::middleware::auth::{require_bearer_auth, AuthKeys};
use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::AppState;

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub jwt_secret: String,
    pub public_rps: u32,
    pub api_rps: u32,
}

impl RouterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            public_rps: config.public_rps,
            api_rps: config.api_rps,
        }
    }
}

pub fn router<S: WellnessStore>(state: AppState<S>, settings: &RouterSettings) -> Router {
    let public_api = Router::new()
        .route("/api/quizzes/active", get(quizzes::get_active_quiz::<S>))
        .route("/api/exercises", get(exercises::list_exercises::<S>))
        .layer(from_fn_with_state(
            RateLimiter::new("public", settings.public_rps),
            rps_middleware,
        ));

    let authenticated_api = Router::new()
        .route("/api/responses/daily", post(responses::submit_daily::<S>))
        .route("/api/responses/me", get(responses::my_history::<S>))
        .route("/api/responses/me/summary", get(responses::my_summary::<S>))
        .route("/api/responses/today", get(responses::today::<S>))
        .route(
            "/api/patients/:id/responses",
            get(responses::patient_history::<S>),
        )
        .route(
            "/api/admin/quizzes",
            get(admin::list_quizzes::<S>).post(admin::create_quiz::<S>),
        )
        .route("/api/admin/quizzes/:id", get(admin::get_quiz::<S>))
        .route(
            "/api/admin/quizzes/:id/activate",
            post(admin::activate_quiz::<S>),
        )
        .route(
            "/api/admin/quizzes/:id/questions",
            post(admin::add_question::<S>),
        )
        .route(
            "/api/admin/quizzes/:id/scoring-rules",
            put(admin::replace_scoring_rules::<S>),
        )
        .route(
            "/api/admin/questions/:id",
            patch(admin::update_question::<S>).delete(admin::delete_question::<S>),
        )
        .route(
            "/api/admin/exercises",
            post(exercises::create_exercise::<S>),
        )
        .route(
            "/api/admin/exercises/:id",
            patch(exercises::update_exercise::<S>).delete(exercises::delete_exercise::<S>),
        )
        .route_layer(from_fn_with_state(
            AuthKeys::from_secret(&settings.jwt_secret),
            require_bearer_auth,
        ))
        .layer(from_fn_with_state(
            RateLimiter::new("api", settings.api_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health::<S>))
        .merge(public_api)
        .merge(authenticated_api)
        .with_state(state)
}
