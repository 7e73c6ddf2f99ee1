// View-duration timer
//
// Explicit two-state machine (idle / viewing) owned by whatever binds the
// UI lifecycle. start() emits a zero-duration view immediately; stop()
// emits a second view carrying floor-of-elapsed seconds. Dropping the
// timer without stop() loses the duration - the owner is expected to call
// stop() on teardown.

use tokio::time::Instant;
use uuid::Uuid;

use crate::tracker::InteractionTracker;
use crate::types::{Interaction, InteractionKind};

struct ActiveView {
    user_id: Uuid,
    event_id: Uuid,
    started: Instant,
}

pub struct ViewTimer {
    tracker: InteractionTracker,
    current: Option<ActiveView>,
}

impl ViewTimer {
    pub fn new(tracker: InteractionTracker) -> Self {
        Self {
            tracker,
            current: None,
        }
    }

    /// Whether a view is currently being timed
    pub fn is_viewing(&self) -> bool {
        self.current.is_some()
    }

    /// Begin timing a view.
    ///
    /// Switching to a different event first closes out the running timer
    /// (emitting its duration), then starts fresh. Re-calling with the
    /// identical (user, event) pair is a no-op.
    pub async fn start(&mut self, user_id: Uuid, event_id: Uuid) {
        if let Some(view) = &self.current {
            if view.user_id == user_id && view.event_id == event_id {
                return;
            }
        }
        self.stop().await;

        self.tracker.record(user_id, Interaction::view(event_id)).await;
        self.current = Some(ActiveView {
            user_id,
            event_id,
            started: Instant::now(),
        });
    }

    /// End the current view, emitting its duration. No-op while idle.
    pub async fn stop(&mut self) {
        if let Some(view) = self.current.take() {
            let elapsed_secs = view.started.elapsed().as_secs() as i64;
            self.tracker
                .record(
                    view.user_id,
                    Interaction::view(view.event_id).with_duration(elapsed_secs),
                )
                .await;
        }
    }

    /// Record a click against the event currently in view
    pub async fn click(&self) {
        self.emit(InteractionKind::Click).await;
    }

    /// Record a bookmark against the event currently in view
    pub async fn bookmark(&self) {
        self.emit(InteractionKind::Bookmark).await;
    }

    /// Record a like against the event currently in view
    pub async fn like(&self) {
        self.emit(InteractionKind::Like).await;
    }

    /// Record a signup against the event currently in view
    pub async fn signup(&self) {
        self.emit(InteractionKind::Signup).await;
    }

    async fn emit(&self, kind: InteractionKind) {
        if let Some(view) = &self.current {
            self.tracker
                .record(view.user_id, Interaction::new(view.event_id, kind))
                .await;
        }
    }
}
