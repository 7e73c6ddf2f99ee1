// Recommendation retrieval - cache first, compute on miss
//
// Cache-first trades freshness for latency. There is no invalidation
// beyond the cache rows' own expiry; a failed write-back is swallowed and
// does not affect what this call returns.

use std::sync::Arc;

use uuid::Uuid;

use crate::traits::EventsBackend;
use crate::types::{Recommendation, SimilarEvent};

/// Fetches per-user recommendations and per-event similarity projections
#[derive(Clone)]
pub struct Recommender {
    backend: Arc<dyn EventsBackend>,
}

impl Recommender {
    /// Default row cap for `for_user`
    pub const DEFAULT_LIMIT: i64 = 10;
    /// Default row cap for `similar_to`
    pub const DEFAULT_SIMILAR_LIMIT: i64 = 5;

    pub fn new(backend: Arc<dyn EventsBackend>) -> Self {
        Self { backend }
    }

    /// Recommendations for a user, at most `limit`, score descending.
    ///
    /// Serves unexpired cache rows when any exist; otherwise invokes the
    /// server-side compute entry point and writes the result back into the
    /// cache. Returns an empty vec on any failure path, never an error.
    pub async fn for_user(&self, user_id: Uuid, limit: i64) -> Vec<Recommendation> {
        match self.backend.cached_recommendations(user_id, limit).await {
            Ok(cached) if !cached.is_empty() => return cached,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Recommendation cache lookup failed: {}", e);
                return Vec::new();
            }
        }

        let mut fresh = match self.backend.compute_recommendations(user_id, limit).await {
            Ok(recs) => recs,
            Err(e) => {
                tracing::warn!(user_id = %user_id, "Recommendation compute failed: {}", e);
                return Vec::new();
            }
        };

        if !fresh.is_empty() {
            if let Err(e) = self.backend.store_recommendations(user_id, &fresh).await {
                // Write-back is best-effort; the caller still gets the rows
                tracing::warn!(user_id = %user_id, "Recommendation cache write failed: {}", e);
            }
        }

        fresh.truncate(limit.max(0) as usize);
        fresh
    }

    /// Precomputed similar events, at most `limit`, similarity descending.
    /// Pure read; empty vec on error.
    pub async fn similar_to(&self, event_id: Uuid, limit: i64) -> Vec<SimilarEvent> {
        match self.backend.similar_events(event_id, limit).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(event_id = %event_id, "Similar events lookup failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryBackend;

    fn rec(score: f64) -> Recommendation {
        Recommendation {
            event_id: Uuid::now_v7(),
            score,
            reason: "popular near you".into(),
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_compute() {
        let backend = Arc::new(MemoryBackend {
            // Compute would blow up if reached
            fail_compute: true,
            ..Default::default()
        });
        {
            let mut state = backend.state.lock().unwrap();
            state.cached = vec![rec(0.9), rec(0.5)];
        }
        let recommender = Recommender::new(backend.clone());

        let recs = recommender.for_user(Uuid::now_v7(), 10).await;
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].score, 0.9);
    }

    #[tokio::test]
    async fn cache_respects_limit() {
        let backend = Arc::new(MemoryBackend::default());
        {
            let mut state = backend.state.lock().unwrap();
            state.cached = vec![rec(0.9), rec(0.8), rec(0.7)];
        }
        let recommender = Recommender::new(backend);

        let recs = recommender.for_user(Uuid::now_v7(), 2).await;
        assert_eq!(recs.len(), 2);
    }

    #[tokio::test]
    async fn cache_miss_computes_and_writes_back() {
        let backend = Arc::new(MemoryBackend::default());
        {
            let mut state = backend.state.lock().unwrap();
            state.computed = vec![rec(0.8), rec(0.6)];
        }
        let recommender = Recommender::new(backend.clone());

        let recs = recommender.for_user(Uuid::now_v7(), 10).await;
        assert_eq!(recs.len(), 2);

        let state = backend.state.lock().unwrap();
        assert_eq!(state.stored, recs);
    }

    #[tokio::test]
    async fn failed_write_back_still_returns_rows() {
        let backend = Arc::new(MemoryBackend {
            fail_cache_write: true,
            ..Default::default()
        });
        {
            let mut state = backend.state.lock().unwrap();
            state.computed = vec![rec(0.8)];
        }
        let recommender = Recommender::new(backend.clone());

        let recs = recommender.for_user(Uuid::now_v7(), 10).await;
        assert_eq!(recs.len(), 1);
        assert!(backend.state.lock().unwrap().stored.is_empty());
    }

    #[tokio::test]
    async fn empty_compute_writes_nothing() {
        let backend = Arc::new(MemoryBackend::default());
        let recommender = Recommender::new(backend.clone());

        let recs = recommender.for_user(Uuid::now_v7(), 10).await;
        assert!(recs.is_empty());
        assert!(backend.state.lock().unwrap().stored.is_empty());
    }

    #[tokio::test]
    async fn every_failure_path_yields_empty() {
        let cache_dead = Arc::new(MemoryBackend {
            fail_cache_read: true,
            ..Default::default()
        });
        assert!(Recommender::new(cache_dead)
            .for_user(Uuid::now_v7(), 10)
            .await
            .is_empty());

        let compute_dead = Arc::new(MemoryBackend {
            fail_compute: true,
            ..Default::default()
        });
        assert!(Recommender::new(compute_dead)
            .for_user(Uuid::now_v7(), 10)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn similar_to_reads_and_degrades_to_empty() {
        let backend = Arc::new(MemoryBackend::default());
        {
            let mut state = backend.state.lock().unwrap();
            state.similar = vec![
                SimilarEvent {
                    event_id: Uuid::now_v7(),
                    similarity: 0.92,
                },
                SimilarEvent {
                    event_id: Uuid::now_v7(),
                    similarity: 0.80,
                },
            ];
        }
        let recommender = Recommender::new(backend);
        let similar = recommender.similar_to(Uuid::now_v7(), 1).await;
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].similarity, 0.92);

        let dead = Arc::new(MemoryBackend {
            fail_similar: true,
            ..Default::default()
        });
        assert!(Recommender::new(dead)
            .similar_to(Uuid::now_v7(), 5)
            .await
            .is_empty());
    }
}
