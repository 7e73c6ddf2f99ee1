// Database-backed EventsBackend implementation
//
// This module implements the core EventsBackend trait over the Postgres
// repository layer. Repository errors (anyhow) are flattened into
// TrackingError::Backend; the fire-and-forget policy itself lives one
// level up, in evently-core.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use evently_core::{
    DeviceInfo, EventsBackend, Interaction, Recommendation, Result, SearchBehavior, SessionUpdate,
    SimilarEvent, TrackingError,
};

use crate::repositories::Database;

/// How long freshly computed recommendations stay servable from the cache
const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Postgres-backed events backend
#[derive(Clone)]
pub struct DbEventsBackend {
    db: Database,
    cache_ttl: Duration,
}

impl DbEventsBackend {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Override the recommendation cache TTL
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Read the cache TTL from RECOMMENDATION_CACHE_TTL_SECS, falling back
    /// to the default when unset or unparsable
    pub fn from_env(db: Database) -> Self {
        let ttl_secs = std::env::var("RECOMMENDATION_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Self::new(db).with_cache_ttl(Duration::seconds(ttl_secs))
    }
}

fn backend_err(e: anyhow::Error) -> TrackingError {
    TrackingError::backend(e.to_string())
}

#[async_trait]
impl EventsBackend for DbEventsBackend {
    async fn upsert_interaction(&self, user_id: Uuid, interaction: &Interaction) -> Result<()> {
        self.db
            .upsert_interaction(user_id, interaction)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn log_search(&self, user_id: Uuid, search: &SearchBehavior) -> Result<()> {
        self.db
            .insert_search_event(user_id, search)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn create_session(&self, user_id: Uuid, device: &DeviceInfo) -> Result<Uuid> {
        let row = self
            .db
            .create_session(user_id, device)
            .await
            .map_err(backend_err)?;
        Ok(row.id)
    }

    async fn update_session(&self, session_id: Uuid, update: &SessionUpdate) -> Result<()> {
        let updated = self
            .db
            .update_session(session_id, update)
            .await
            .map_err(backend_err)?;
        if updated.is_none() {
            return Err(TrackingError::session_not_found(session_id));
        }
        Ok(())
    }

    async fn close_session(&self, session_id: Uuid, ended_at: DateTime<Utc>) -> Result<()> {
        // false means either "already closed" (fine, one-way transition)
        // or "no such session"; distinguish to keep the log honest
        let closed = self
            .db
            .close_session(session_id, ended_at)
            .await
            .map_err(backend_err)?;
        if !closed && self.db.get_session(session_id).await.map_err(backend_err)?.is_none() {
            return Err(TrackingError::session_not_found(session_id));
        }
        Ok(())
    }

    async fn cached_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>> {
        let rows = self
            .db
            .cached_recommendations(user_id, limit)
            .await
            .map_err(backend_err)?;
        Ok(rows.into_iter().map(Recommendation::from).collect())
    }

    async fn compute_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>> {
        let rows = self
            .db
            .compute_recommendations(user_id, limit)
            .await
            .map_err(backend_err)?;
        Ok(rows.into_iter().map(Recommendation::from).collect())
    }

    async fn store_recommendations(&self, user_id: Uuid, recs: &[Recommendation]) -> Result<()> {
        if recs.is_empty() {
            return Ok(());
        }
        let expires_at = Utc::now() + self.cache_ttl;
        self.db
            .upsert_recommendations(user_id, recs, expires_at)
            .await
            .map_err(backend_err)
    }

    async fn similar_events(&self, event_id: Uuid, limit: i64) -> Result<Vec<SimilarEvent>> {
        let rows = self
            .db
            .similar_events(event_id, limit)
            .await
            .map_err(backend_err)?;
        Ok(rows.into_iter().map(SimilarEvent::from).collect())
    }
}
