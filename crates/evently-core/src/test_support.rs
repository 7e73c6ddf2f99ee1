// In-memory EventsBackend doubles for unit tests
//
// One backend, a bag of failure switches. Each switch makes the matching
// group of calls fail so the log-and-swallow policy can be exercised.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Result, TrackingError};
use crate::traits::EventsBackend;
use crate::types::{
    DeviceInfo, Interaction, InteractionKind, Recommendation, SearchBehavior, SessionUpdate,
    SimilarEvent,
};

#[derive(Default)]
pub struct MemoryBackend {
    pub fail_interactions: bool,
    pub fail_sessions: bool,
    pub fail_cache_read: bool,
    pub fail_compute: bool,
    pub fail_cache_write: bool,
    pub fail_similar: bool,
    pub state: Mutex<BackendState>,
}

#[derive(Default)]
pub struct BackendState {
    /// Every upserted interaction in call order
    pub recorded: Vec<(Uuid, Interaction)>,
    /// Upsert keys, mirroring the backend's conflict target
    pub by_key: HashMap<(Uuid, Uuid, InteractionKind, NaiveDate), Interaction>,
    pub searches: Vec<(Uuid, SearchBehavior)>,
    pub sessions: HashMap<Uuid, MemorySession>,
    /// Rows pre-seeded into the recommendation cache (already score-sorted)
    pub cached: Vec<Recommendation>,
    /// Rows the compute entry point will return
    pub computed: Vec<Recommendation>,
    /// Rows written back into the cache
    pub stored: Vec<Recommendation>,
    pub similar: Vec<SimilarEvent>,
}

pub struct MemorySession {
    pub user_id: Uuid,
    pub device: DeviceInfo,
    pub updates: Vec<SessionUpdate>,
    pub ended_at: Option<DateTime<Utc>>,
}

fn injected<T>() -> Result<T> {
    Err(TrackingError::backend("injected failure"))
}

#[async_trait]
impl EventsBackend for MemoryBackend {
    async fn upsert_interaction(&self, user_id: Uuid, interaction: &Interaction) -> Result<()> {
        if self.fail_interactions {
            return injected();
        }
        let mut state = self.state.lock().unwrap();
        state.recorded.push((user_id, interaction.clone()));
        let key = (
            user_id,
            interaction.event_id,
            interaction.kind,
            interaction.occurred_at.date_naive(),
        );
        state.by_key.insert(key, interaction.clone());
        Ok(())
    }

    async fn log_search(&self, user_id: Uuid, search: &SearchBehavior) -> Result<()> {
        if self.fail_interactions {
            return injected();
        }
        let mut state = self.state.lock().unwrap();
        state.searches.push((user_id, search.clone()));
        Ok(())
    }

    async fn create_session(&self, user_id: Uuid, device: &DeviceInfo) -> Result<Uuid> {
        if self.fail_sessions {
            return injected();
        }
        let id = Uuid::now_v7();
        let mut state = self.state.lock().unwrap();
        state.sessions.insert(
            id,
            MemorySession {
                user_id,
                device: device.clone(),
                updates: Vec::new(),
                ended_at: None,
            },
        );
        Ok(id)
    }

    async fn update_session(&self, session_id: Uuid, update: &SessionUpdate) -> Result<()> {
        if self.fail_sessions {
            return injected();
        }
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| TrackingError::session_not_found(session_id))?;
        session.updates.push(update.clone());
        Ok(())
    }

    async fn close_session(&self, session_id: Uuid, ended_at: DateTime<Utc>) -> Result<()> {
        if self.fail_sessions {
            return injected();
        }
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| TrackingError::session_not_found(session_id))?;
        // One-way transition, same guard as the SQL implementation
        if session.ended_at.is_none() {
            session.ended_at = Some(ended_at);
        }
        Ok(())
    }

    async fn cached_recommendations(
        &self,
        _user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>> {
        if self.fail_cache_read {
            return injected();
        }
        let state = self.state.lock().unwrap();
        Ok(state.cached.iter().take(limit as usize).cloned().collect())
    }

    async fn compute_recommendations(
        &self,
        _user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Recommendation>> {
        if self.fail_compute {
            return injected();
        }
        let state = self.state.lock().unwrap();
        Ok(state.computed.iter().take(limit as usize).cloned().collect())
    }

    async fn store_recommendations(&self, _user_id: Uuid, recs: &[Recommendation]) -> Result<()> {
        if self.fail_cache_write {
            return injected();
        }
        let mut state = self.state.lock().unwrap();
        state.stored.extend_from_slice(recs);
        Ok(())
    }

    async fn similar_events(&self, _event_id: Uuid, limit: i64) -> Result<Vec<SimilarEvent>> {
        if self.fail_similar {
            return injected();
        }
        let state = self.state.lock().unwrap();
        Ok(state.similar.iter().take(limit as usize).cloned().collect())
    }
}
