// Session lifecycle HTTP routes
//
// start is the one endpoint that can visibly fail (503 when the tracker
// could not open a session); update and end follow the fire-and-forget
// policy and always answer 202.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use evently_core::{DeviceInfo, Session, SessionTracker, SessionUpdate};
use evently_storage::Database;

/// Request to open a session
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StartSessionRequest {
    /// Device/browser context, captured once at session start.
    #[serde(default)]
    pub device: DeviceInfo,
}

/// Response carrying the backend-assigned session id
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionStartedResponse {
    pub id: Uuid,
}

/// Request to update a session. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    /// Paths visited so far, in visit order. Replaces the stored list.
    #[serde(default)]
    pub pages_viewed: Option<Vec<String>>,
    /// Event ids viewed so far, in view order. Replaces the stored list.
    #[serde(default)]
    pub events_viewed: Option<Vec<Uuid>>,
    #[serde(default)]
    pub total_time_secs: Option<i64>,
}

/// App state for session routes
#[derive(Clone)]
pub struct AppState {
    pub tracker: SessionTracker,
    pub db: Database,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users/:user_id/sessions", post(start_session))
        .route(
            "/v1/sessions/:session_id",
            get(get_session).patch(update_session),
        )
        .route("/v1/sessions/:session_id/end", post(end_session))
        .with_state(state)
}

/// POST /v1/users/{user_id}/sessions - Open a tracking session
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/sessions",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionStartedResponse),
        (status = 503, description = "Tracking unavailable")
    ),
    tag = "sessions"
)]
pub async fn start_session(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionStartedResponse>), StatusCode> {
    match state.tracker.start(user_id, req.device).await {
        Some(id) => Ok((StatusCode::CREATED, Json(SessionStartedResponse { id }))),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// GET /v1/sessions/{session_id} - Fetch a session
#[utoipa::path(
    get,
    path = "/v1/sessions/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = Session),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, StatusCode> {
    let row = state.db.get_session(session_id).await.map_err(|e| {
        tracing::error!("Failed to fetch session: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match row {
        Some(row) => Ok(Json(row.into())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// PATCH /v1/sessions/{session_id} - Partially update a session
#[utoipa::path(
    patch,
    path = "/v1/sessions/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateSessionRequest,
    responses(
        (status = 202, description = "Update accepted")
    ),
    tag = "sessions"
)]
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> StatusCode {
    let update = SessionUpdate {
        pages_viewed: req.pages_viewed,
        events_viewed: req.events_viewed,
        total_time_secs: req.total_time_secs,
    };
    state.tracker.update(session_id, update).await;
    StatusCode::ACCEPTED
}

/// POST /v1/sessions/{session_id}/end - Close a session
///
/// Closing is one-way; repeated calls leave the first end timestamp alone.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/end",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 202, description = "Close accepted")
    ),
    tag = "sessions"
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> StatusCode {
    state.tracker.end(session_id).await;
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_accepts_empty_body() {
        let req: StartSessionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.device.user_agent.is_none());
    }

    #[test]
    fn update_request_is_partial() {
        let req: UpdateSessionRequest = serde_json::from_value(json!({
            "total_time_secs": 90
        }))
        .unwrap();
        assert!(req.pages_viewed.is_none());
        assert_eq!(req.total_time_secs, Some(90));
    }
}
