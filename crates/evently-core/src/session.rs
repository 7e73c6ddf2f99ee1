// Session tracker - lifecycle of one browsing session
//
// start() hands the caller an Option<Uuid>; None means "tracking
// unavailable" and the caller simply never calls update/end. Closing a
// session is one-way - the backend guard keeps the first end timestamp.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::traits::EventsBackend;
use crate::types::{DeviceInfo, SessionUpdate};

#[derive(Clone)]
pub struct SessionTracker {
    backend: Arc<dyn EventsBackend>,
}

impl SessionTracker {
    pub fn new(backend: Arc<dyn EventsBackend>) -> Self {
        Self { backend }
    }

    /// Open a session, capturing device context once.
    ///
    /// Returns the backend-assigned session id, or None when the backend is
    /// unreachable. No error surfaces to the caller.
    pub async fn start(&self, user_id: Uuid, device: DeviceInfo) -> Option<Uuid> {
        match self.backend.create_session(user_id, &device).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Failed to start session: {}", e);
                None
            }
        }
    }

    /// Partial overwrite: only fields present in `update` are touched.
    pub async fn update(&self, session_id: Uuid, update: SessionUpdate) {
        if update.is_empty() {
            return;
        }
        if let Err(e) = self.backend.update_session(session_id, &update).await {
            tracing::warn!(session_id = %session_id, "Failed to update session: {}", e);
        }
    }

    /// Close the session at the current time. Calling this twice leaves the
    /// first end timestamp in place.
    pub async fn end(&self, session_id: Uuid) {
        if let Err(e) = self.backend.close_session(session_id, Utc::now()).await {
            tracing::warn!(session_id = %session_id, "Failed to end session: {}", e);
        }
    }
}
