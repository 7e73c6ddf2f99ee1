// Evently tracking API server
//
// Ingestion endpoints for interactions, searches and sessions, plus read
// endpoints for recommendations and similar events. Telemetry ingestion is
// fire-and-forget: backend failures are logged and answered with 202 anyway.

mod common;
mod interactions;
mod recommendations;
mod sessions;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use evently_core::{InteractionTracker, Recommender, SessionTracker};
use evently_storage::{Database, DbEventsBackend};

use crate::common::ListResponse;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        interactions::record_interaction,
        interactions::record_search,
        sessions::start_session,
        sessions::get_session,
        sessions::update_session,
        sessions::end_session,
        recommendations::get_recommendations,
        recommendations::get_similar_events,
    ),
    components(
        schemas(
            evently_core::InteractionKind,
            evently_core::DeviceInfo,
            evently_core::Session,
            evently_core::Recommendation,
            evently_core::SimilarEvent,
            interactions::RecordInteractionRequest,
            interactions::RecordSearchRequest,
            sessions::StartSessionRequest,
            sessions::SessionStartedResponse,
            sessions::UpdateSessionRequest,
            ListResponse<evently_core::Recommendation>,
            ListResponse<evently_core::SimilarEvent>,
        )
    ),
    tags(
        (name = "interactions", description = "Interaction and search ingestion endpoints"),
        (name = "sessions", description = "Session lifecycle endpoints"),
        (name = "recommendations", description = "Recommendation and similarity read endpoints")
    ),
    info(
        title = "Evently Tracking API",
        version = "0.1.0",
        description = "API for recording user behavior and serving cached event recommendations",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evently_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("evently-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // One backend instance shared by all trackers
    let backend = Arc::new(DbEventsBackend::from_env(db.clone()));

    let interactions_state = interactions::AppState {
        tracker: InteractionTracker::new(backend.clone()),
    };
    let sessions_state = sessions::AppState {
        tracker: SessionTracker::new(backend.clone()),
        db,
    };
    let recommendations_state = recommendations::AppState {
        recommender: Recommender::new(backend),
    };

    // Load CORS allowed origins from environment (optional)
    // Only needed when UI is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    let app = Router::new()
        .route("/health", get(health))
        .merge(interactions::routes(interactions_state))
        .merge(sessions::routes(sessions_state))
        .merge(recommendations::routes(recommendations_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
