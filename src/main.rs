use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use booking_assistant::config::AppConfig;
use booking_assistant::handlers;
use booking_assistant::services::sessions::SessionStore;
use booking_assistant::services::upstream::http::HttpBackend;
use booking_assistant::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!(
        base_url = %config.api_base_url,
        timezone = config.business_timezone.name(),
        "using assistant backend"
    );
    let backend = HttpBackend::new(
        config.api_base_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?;

    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.session_ttl_minutes),
        config: config.clone(),
        backend: Box::new(backend),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/widget/calendar", get(handlers::calendar::month))
        .route("/api/widget/sessions", post(handlers::widget::create_session))
        .route(
            "/api/widget/sessions/:id",
            get(handlers::widget::get_session).delete(handlers::widget::close_session),
        )
        .route(
            "/api/widget/sessions/:id/events",
            post(handlers::widget::post_event),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
