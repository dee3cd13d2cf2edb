use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use wellness_backend::{
    config::{get_config, init_config, Config},
    database::{
        pool::{create_pool, run_migrations},
        MemoryStore, PgStore, WellnessStore,
    },
    middleware::cors::cors_layer,
    routes::{self, RouterSettings},
    utils::{telemetry, time::SystemClock},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;
    telemetry::init(config.log_json)?;

    if config.database_url.is_some() {
        let pool = create_pool(config).await?;
        run_migrations(&pool).await?;
        info!("Connected to Postgres and applied migrations");
        serve(PgStore::new(pool), config).await
    } else {
        tracing::warn!("DATABASE_URL not set, running on the in-memory store; data is lost on exit");
        serve(MemoryStore::new(), config).await
    }
}

async fn serve<S: WellnessStore>(store: S, config: &Config) -> anyhow::Result<()> {
    let app_state = AppState::new(
        Arc::new(store),
        Arc::new(SystemClock),
        config.bootstrap_default_quiz,
    );

    if config.bootstrap_default_quiz {
        let quiz = app_state.quiz_service.ensure_default_quiz().await?;
        info!(quiz_id = %quiz.id, name = %quiz.name, "Active quiz ready");
    }
    app_state.exercise_service.ensure_baseline().await?;

    let app = routes::router(app_state, &RouterSettings::from_config(config))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
