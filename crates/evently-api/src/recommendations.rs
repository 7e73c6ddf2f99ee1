// Recommendation and similarity read routes
//
// Both reads degrade to an empty list instead of erroring, mirroring the
// retriever's policy, so the handlers are infallible.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use evently_core::{Recommendation, Recommender, SimilarEvent};

use crate::common::ListResponse;

/// Query parameters for capped list reads
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LimitQuery {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
}

/// App state for recommendation routes
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/users/:user_id/recommendations",
            get(get_recommendations),
        )
        .route("/v1/events/:event_id/similar", get(get_similar_events))
        .with_state(state)
}

/// GET /v1/users/{user_id}/recommendations - Per-user event suggestions
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/recommendations",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        LimitQuery
    ),
    responses(
        (status = 200, description = "Recommendations, score descending (possibly empty)", body = ListResponse<Recommendation>)
    ),
    tag = "recommendations"
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Json<ListResponse<Recommendation>> {
    let limit = query.limit.unwrap_or(Recommender::DEFAULT_LIMIT);
    let recs = state.recommender.for_user(user_id, limit).await;
    Json(ListResponse::new(recs))
}

/// GET /v1/events/{event_id}/similar - Precomputed similar events
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/similar",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        LimitQuery
    ),
    responses(
        (status = 200, description = "Similar events, similarity descending (possibly empty)", body = ListResponse<SimilarEvent>)
    ),
    tag = "recommendations"
)]
pub async fn get_similar_events(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Json<ListResponse<SimilarEvent>> {
    let limit = query.limit.unwrap_or(Recommender::DEFAULT_SIMILAR_LIMIT);
    let similar = state.recommender.similar_to(event_id, limit).await;
    Json(ListResponse::new(similar))
}
