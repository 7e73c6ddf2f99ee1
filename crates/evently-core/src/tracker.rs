// Interaction tracker - best-effort telemetry writes
//
// Telemetry must never break the product: every backend failure here is
// logged and swallowed. No retry, no local buffering; a dropped write is
// simply a lost data point.

use std::sync::Arc;

use uuid::Uuid;

use crate::traits::EventsBackend;
use crate::types::{Interaction, SearchBehavior};

/// Records discrete user actions against events
///
/// One upsert per call, keyed by (user, event, kind, calendar day) on the
/// backend so rapid repeats collapse to the latest write.
#[derive(Clone)]
pub struct InteractionTracker {
    backend: Arc<dyn EventsBackend>,
}

impl InteractionTracker {
    pub fn new(backend: Arc<dyn EventsBackend>) -> Self {
        Self { backend }
    }

    /// Record one interaction. Never fails from the caller's perspective.
    pub async fn record(&self, user_id: Uuid, interaction: Interaction) {
        if let Err(e) = self.backend.upsert_interaction(user_id, &interaction).await {
            tracing::warn!(
                user_id = %user_id,
                event_id = %interaction.event_id,
                kind = %interaction.kind,
                "Failed to record interaction: {}",
                e
            );
        }
    }

    /// Append one search-behavior log entry. Same failure policy as `record`.
    pub async fn record_search(&self, user_id: Uuid, search: SearchBehavior) {
        if let Err(e) = self.backend.log_search(user_id, &search).await {
            tracing::warn!(user_id = %user_id, "Failed to record search: {}", e);
        }
    }
}
