// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use evently_core::{DeviceInfo, Recommendation, Session, SimilarEvent};

// ============================================
// Interaction models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct InteractionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub kind: String,
    pub duration_secs: Option<i64>,
    pub metadata: Option<sqlx::types::JsonValue>,
    pub occurred_at: DateTime<Utc>,
    /// Calendar-day bucket, the fourth column of the upsert key
    pub day: NaiveDate,
}

#[derive(Debug, Clone, FromRow)]
pub struct SearchEventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: Option<String>,
    pub filters: sqlx::types::JsonValue,
    pub results_count: i32,
    pub clicked_event_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Session models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub platform: Option<String>,
    pub screen_size: Option<String>,
    pub timezone: Option<String>,
    pub pages_viewed: Vec<String>,
    pub events_viewed: Vec<Uuid>,
    pub total_time_secs: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            device: DeviceInfo {
                user_agent: row.user_agent,
                language: row.language,
                platform: row.platform,
                screen_size: row.screen_size,
                timezone: row.timezone,
            },
            pages_viewed: row.pages_viewed,
            events_viewed: row.events_viewed,
            total_time_secs: row.total_time_secs,
            started_at: row.started_at,
            ended_at: row.ended_at,
        }
    }
}

// ============================================
// Recommendation models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub score: f64,
    pub reason: String,
    pub computed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            event_id: row.event_id,
            score: row.score,
            reason: row.reason,
        }
    }
}

/// Shape returned by the compute_recommendations() SQL entry point
#[derive(Debug, Clone, FromRow)]
pub struct ComputedRecommendationRow {
    pub event_id: Uuid,
    pub score: f64,
    pub reason: String,
}

impl From<ComputedRecommendationRow> for Recommendation {
    fn from(row: ComputedRecommendationRow) -> Self {
        Recommendation {
            event_id: row.event_id,
            score: row.score,
            reason: row.reason,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SimilarEventRow {
    pub similar_event_id: Uuid,
    pub similarity: f64,
}

impl From<SimilarEventRow> for SimilarEvent {
    fn from(row: SimilarEventRow) -> Self {
        SimilarEvent {
            event_id: row.similar_event_id,
            similarity: row.similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_row_maps_device_fields() {
        let row = SessionRow {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            user_agent: Some("Mozilla/5.0".into()),
            language: Some("de-DE".into()),
            platform: Some("MacIntel".into()),
            screen_size: Some("1512x982".into()),
            timezone: Some("Europe/Berlin".into()),
            pages_viewed: vec!["/feed".into()],
            events_viewed: vec![],
            total_time_secs: 0,
            started_at: Utc::now(),
            ended_at: None,
        };
        let session: Session = row.clone().into();
        assert_eq!(session.device.timezone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(session.pages_viewed, row.pages_viewed);
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn similar_event_row_exposes_the_neighbor_id() {
        let neighbor = Uuid::now_v7();
        let similar: SimilarEvent = SimilarEventRow {
            similar_event_id: neighbor,
            similarity: 0.7,
        }
        .into();
        assert_eq!(similar.event_id, neighbor);
    }
}
