// The pluggable backend trait
//
// The tracking layer never talks to a database directly; it goes through
// EventsBackend so it can be used with different backends:
// - Postgres implementation in evently-storage for production
// - In-memory implementations for tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{
    DeviceInfo, Interaction, Recommendation, SearchBehavior, SessionUpdate, SimilarEvent,
};

/// Backend surface consumed by the tracking layer
///
/// Five logical tables sit behind this trait (interactions, search log,
/// sessions, recommendation cache, similarity edges) plus one server-side
/// compute entry point. Implementations must provide two conflict keys:
/// interactions upsert on (user, event, kind, day) and the recommendation
/// cache upserts on (user, event).
#[async_trait]
pub trait EventsBackend: Send + Sync {
    /// Upsert one interaction row; same-day duplicates for the same
    /// (user, event, kind) collapse to the latest write
    async fn upsert_interaction(&self, user_id: Uuid, interaction: &Interaction) -> Result<()>;

    /// Append one search-behavior log row
    async fn log_search(&self, user_id: Uuid, search: &SearchBehavior) -> Result<()>;

    /// Create a session row and return its backend-assigned id
    async fn create_session(&self, user_id: Uuid, device: &DeviceInfo) -> Result<Uuid>;

    /// Partially update a session; only the provided fields are touched
    async fn update_session(&self, session_id: Uuid, update: &SessionUpdate) -> Result<()>;

    /// Set the session's end timestamp. Must be one-way: a second close
    /// must leave the first `ended_at` untouched.
    async fn close_session(&self, session_id: Uuid, ended_at: DateTime<Utc>) -> Result<()>;

    /// Unexpired cached recommendations for a user, ordered by score
    /// descending, at most `limit` rows
    async fn cached_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>>;

    /// Invoke the server-side recommendation computation
    async fn compute_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>>;

    /// Write freshly computed recommendations into the cache, upserting on
    /// (user, event) so repeats refresh rather than duplicate
    async fn store_recommendations(&self, user_id: Uuid, recs: &[Recommendation]) -> Result<()>;

    /// Precomputed similar events, ordered by similarity descending,
    /// at most `limit` rows
    async fn similar_events(&self, event_id: Uuid, limit: i64) -> Result<Vec<SimilarEvent>>;
}
