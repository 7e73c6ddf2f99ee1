// Domain types shared by the tracking layer and its backends
//
// These are the wire-level shapes the web UI produces. Opaque payloads
// (interaction metadata, search filters) stay as serde_json::Value - the
// client never inspects them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::TrackingError;

/// The kind of user action recorded against an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Click,
    Bookmark,
    Like,
    Signup,
    Attend,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Bookmark => "bookmark",
            InteractionKind::Like => "like",
            InteractionKind::Signup => "signup",
            InteractionKind::Attend => "attend",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(InteractionKind::View),
            "click" => Ok(InteractionKind::Click),
            "bookmark" => Ok(InteractionKind::Bookmark),
            "like" => Ok(InteractionKind::Like),
            "signup" => Ok(InteractionKind::Signup),
            "attend" => Ok(InteractionKind::Attend),
            other => Err(TrackingError::invalid_record(format!(
                "unknown interaction kind: {other}"
            ))),
        }
    }
}

/// A single recorded user action against an event
///
/// Interactions upsert on (user, event, kind, calendar day): repeating the
/// same action on the same day replaces the earlier row instead of
/// accumulating duplicates. Enforcing that key is the backend's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub event_id: Uuid,
    pub kind: InteractionKind,
    /// Seconds the event was on screen; only view interactions carry this
    #[serde(default)]
    pub duration_secs: Option<i64>,
    /// Opaque key-value payload supplied by the UI
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}

impl Interaction {
    /// Create an interaction of the given kind, timestamped now
    pub fn new(event_id: Uuid, kind: InteractionKind) -> Self {
        Self {
            event_id,
            kind,
            duration_secs: None,
            metadata: None,
            occurred_at: Utc::now(),
        }
    }

    /// Shorthand for a view interaction
    pub fn view(event_id: Uuid) -> Self {
        Self::new(event_id, InteractionKind::View)
    }

    /// Attach a view duration in whole seconds
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    /// Attach opaque metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One search the user performed, plus what they clicked afterwards
///
/// Append-only: every search produces a new log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBehavior {
    #[serde(default)]
    pub query: Option<String>,
    /// Active filters at search time, opaque to the client
    #[serde(default = "empty_object")]
    pub filters: serde_json::Value,
    pub results_count: i32,
    /// Event ids clicked from the result list, in click order
    #[serde(default)]
    pub clicked_event_ids: Vec<Uuid>,
}

impl Default for SearchBehavior {
    fn default() -> Self {
        Self {
            query: None,
            filters: empty_object(),
            results_count: 0,
            clicked_event_ids: Vec::new(),
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Device and browser context captured once at session start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeviceInfo {
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub screen_size: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A bounded interval of user activity
///
/// Created at session start, mutated via partial updates while the user
/// browses, finalized by setting `ended_at`. Closing is one-way: once
/// `ended_at` is set it is never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device: DeviceInfo,
    /// Paths visited during the session, in visit order
    pub pages_viewed: Vec<String>,
    /// Event ids viewed during the session, in view order
    pub events_viewed: Vec<Uuid>,
    pub total_time_secs: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Partial session update. Only provided fields are touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(default)]
    pub pages_viewed: Option<Vec<String>>,
    #[serde(default)]
    pub events_viewed: Option<Vec<Uuid>>,
    #[serde(default)]
    pub total_time_secs: Option<i64>,
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.pages_viewed.is_none() && self.events_viewed.is_none() && self.total_time_secs.is_none()
    }
}

/// A cached, per-user event suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recommendation {
    pub event_id: Uuid,
    /// Numeric rank assigned by the server-side scorer; higher is better
    pub score: f64,
    /// Human-readable explanation ("popular near you", ...)
    pub reason: String,
}

/// A precomputed similarity edge between two events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SimilarEvent {
    pub event_id: Uuid,
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn interaction_kind_round_trips_through_str() {
        for kind in [
            InteractionKind::View,
            InteractionKind::Click,
            InteractionKind::Bookmark,
            InteractionKind::Like,
            InteractionKind::Signup,
            InteractionKind::Attend,
        ] {
            assert_eq!(kind.as_str().parse::<InteractionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn interaction_kind_rejects_unknown() {
        assert!("hover".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn interaction_kind_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_value(InteractionKind::Bookmark).unwrap(),
            json!("bookmark")
        );
    }

    #[test]
    fn view_constructor_has_no_duration() {
        let interaction = Interaction::view(Uuid::now_v7());
        assert_eq!(interaction.kind, InteractionKind::View);
        assert!(interaction.duration_secs.is_none());
        assert!(interaction.metadata.is_none());
    }

    #[test]
    fn with_duration_sets_seconds() {
        let interaction = Interaction::view(Uuid::now_v7()).with_duration(42);
        assert_eq!(interaction.duration_secs, Some(42));
    }

    #[test]
    fn session_update_default_is_empty() {
        assert!(SessionUpdate::default().is_empty());
        let update = SessionUpdate {
            total_time_secs: Some(10),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn search_behavior_deserializes_with_defaults() {
        let search: SearchBehavior = serde_json::from_value(json!({
            "results_count": 3
        }))
        .unwrap();
        assert!(search.query.is_none());
        assert!(search.filters.is_object());
        assert!(search.clicked_event_ids.is_empty());
    }
}
