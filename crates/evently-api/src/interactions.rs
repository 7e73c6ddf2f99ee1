// Interaction and search ingestion routes
//
// Ingestion is fire-and-forget end to end: the tracker swallows backend
// failures, so these endpoints always answer 202.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use evently_core::{Interaction, InteractionKind, InteractionTracker, SearchBehavior};

/// Request to record one interaction
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordInteractionRequest {
    /// The event the action was taken on.
    pub event_id: Uuid,
    /// What the user did.
    #[schema(example = "bookmark")]
    pub kind: InteractionKind,
    /// Seconds the event was on screen (view interactions only).
    #[serde(default)]
    pub duration_secs: Option<i64>,
    /// Opaque key-value payload. Stored as-is.
    #[serde(default)]
    #[schema(example = json!({"source": "feed"}))]
    pub metadata: Option<serde_json::Value>,
}

/// Request to log one search and its outcome
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordSearchRequest {
    #[serde(default)]
    #[schema(example = "open air jazz")]
    pub query: Option<String>,
    /// Active filters at search time.
    #[serde(default)]
    #[schema(example = json!({"city": "berlin"}))]
    pub filters: Option<serde_json::Value>,
    pub results_count: i32,
    /// Result events the user clicked, in click order.
    #[serde(default)]
    pub clicked_event_ids: Vec<Uuid>,
}

/// App state for ingestion routes
#[derive(Clone)]
pub struct AppState {
    pub tracker: InteractionTracker,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users/:user_id/interactions", post(record_interaction))
        .route("/v1/users/:user_id/searches", post(record_search))
        .with_state(state)
}

/// POST /v1/users/{user_id}/interactions - Record a user interaction
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/interactions",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = RecordInteractionRequest,
    responses(
        (status = 202, description = "Interaction accepted")
    ),
    tag = "interactions"
)]
pub async fn record_interaction(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<RecordInteractionRequest>,
) -> StatusCode {
    let mut interaction = Interaction::new(req.event_id, req.kind);
    interaction.duration_secs = req.duration_secs;
    interaction.metadata = req.metadata;
    state.tracker.record(user_id, interaction).await;
    StatusCode::ACCEPTED
}

/// POST /v1/users/{user_id}/searches - Log a search and its clicks
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/searches",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = RecordSearchRequest,
    responses(
        (status = 202, description = "Search accepted")
    ),
    tag = "interactions"
)]
pub async fn record_search(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<RecordSearchRequest>,
) -> StatusCode {
    let search = SearchBehavior {
        query: req.query,
        filters: req.filters.unwrap_or_else(|| json!({})),
        results_count: req.results_count,
        clicked_event_ids: req.clicked_event_ids,
    };
    state.tracker.record_search(user_id, search).await;
    StatusCode::ACCEPTED
}
