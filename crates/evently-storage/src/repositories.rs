// Repository layer for database operations
//
// The conflict targets here carry the tracking semantics: interactions
// collapse per (user, event, kind, day) and cache rows refresh per
// (user, event). Everything else is plain CRUD.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use evently_core::{DeviceInfo, Interaction, Recommendation, SearchBehavior, SessionUpdate};

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    // ============================================
    // Interactions (upsert per user/event/kind/day)
    // ============================================

    pub async fn upsert_interaction(
        &self,
        user_id: Uuid,
        interaction: &Interaction,
    ) -> Result<InteractionRow> {
        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            INSERT INTO interactions (user_id, event_id, kind, duration_secs, metadata, occurred_at, day)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, event_id, kind, day) DO UPDATE SET
                duration_secs = EXCLUDED.duration_secs,
                metadata = EXCLUDED.metadata,
                occurred_at = EXCLUDED.occurred_at
            RETURNING id, user_id, event_id, kind, duration_secs, metadata, occurred_at, day
            "#,
        )
        .bind(user_id)
        .bind(interaction.event_id)
        .bind(interaction.kind.as_str())
        .bind(interaction.duration_secs)
        .bind(&interaction.metadata)
        .bind(interaction.occurred_at)
        .bind(interaction.occurred_at.date_naive())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Search behavior (append-only log)
    // ============================================

    pub async fn insert_search_event(
        &self,
        user_id: Uuid,
        search: &SearchBehavior,
    ) -> Result<SearchEventRow> {
        let row = sqlx::query_as::<_, SearchEventRow>(
            r#"
            INSERT INTO search_events (user_id, query, filters, results_count, clicked_event_ids)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, query, filters, results_count, clicked_event_ids, created_at
            "#,
        )
        .bind(user_id)
        .bind(&search.query)
        .bind(&search.filters)
        .bind(search.results_count)
        .bind(&search.clicked_event_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Sessions
    // ============================================

    pub async fn create_session(&self, user_id: Uuid, device: &DeviceInfo) -> Result<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (user_id, user_agent, language, platform, screen_size, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, user_agent, language, platform, screen_size, timezone,
                      pages_viewed, events_viewed, total_time_secs, started_at, ended_at
            "#,
        )
        .bind(user_id)
        .bind(&device.user_agent)
        .bind(&device.language)
        .bind(&device.platform)
        .bind(&device.screen_size)
        .bind(&device.timezone)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Option<SessionRow>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, user_agent, language, platform, screen_size, timezone,
                   pages_viewed, events_viewed, total_time_secs, started_at, ended_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_session(
        &self,
        id: Uuid,
        update: &SessionUpdate,
    ) -> Result<Option<SessionRow>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE sessions
            SET
                pages_viewed = COALESCE($2, pages_viewed),
                events_viewed = COALESCE($3, events_viewed),
                total_time_secs = COALESCE($4, total_time_secs)
            WHERE id = $1
            RETURNING id, user_id, user_agent, language, platform, screen_size, timezone,
                      pages_viewed, events_viewed, total_time_secs, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(&update.pages_viewed)
        .bind(&update.events_viewed)
        .bind(update.total_time_secs)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Set the session's end timestamp. The `ended_at IS NULL` guard makes
    /// closing one-way: a second close changes nothing.
    pub async fn close_session(&self, id: Uuid, ended_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET ended_at = $2
            WHERE id = $1 AND ended_at IS NULL
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Recommendation cache
    // ============================================

    pub async fn cached_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecommendationRow>> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT user_id, event_id, score, reason, computed_at, expires_at
            FROM recommendation_cache
            WHERE user_id = $1 AND expires_at > NOW()
            ORDER BY score DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn upsert_recommendations(
        &self,
        user_id: Uuid,
        recs: &[Recommendation],
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let event_ids: Vec<Uuid> = recs.iter().map(|r| r.event_id).collect();
        let scores: Vec<f64> = recs.iter().map(|r| r.score).collect();
        let reasons: Vec<String> = recs.iter().map(|r| r.reason.clone()).collect();

        sqlx::query(
            r#"
            INSERT INTO recommendation_cache (user_id, event_id, score, reason, computed_at, expires_at)
            SELECT $1, t.event_id, t.score, t.reason, NOW(), $5
            FROM UNNEST($2::uuid[], $3::float8[], $4::text[]) AS t(event_id, score, reason)
            ON CONFLICT (user_id, event_id) DO UPDATE SET
                score = EXCLUDED.score,
                reason = EXCLUDED.reason,
                computed_at = EXCLUDED.computed_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(user_id)
        .bind(&event_ids)
        .bind(&scores)
        .bind(&reasons)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Invoke the server-side compute entry point
    ///
    /// The function body ships as a stub (zero rows); deployments replace it
    /// with the real scorer. The client treats it as opaque either way.
    pub async fn compute_recommendations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ComputedRecommendationRow>> {
        let rows = sqlx::query_as::<_, ComputedRecommendationRow>(
            r#"
            SELECT event_id, score, reason
            FROM compute_recommendations($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Similarity edges (read-only)
    // ============================================

    pub async fn similar_events(&self, event_id: Uuid, limit: i64) -> Result<Vec<SimilarEventRow>> {
        let rows = sqlx::query_as::<_, SimilarEventRow>(
            r#"
            SELECT similar_event_id, similarity
            FROM event_similarity
            WHERE event_id = $1
            ORDER BY similarity DESC
            LIMIT $2
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
