//! Scoring Engine
//!
//! Computes the popularity score and its component breakdown for a single
//! post. Pure and deterministic: same metrics + same `now` always yield a
//! bit-identical breakdown, which is what makes the minute-bucket cache safe.

use crate::config::ScoringWeights;
use crate::models::{PostMetrics, ScoreBreakdown};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::warn;
use uuid::Uuid;

/// Round to 2 decimal places for display stability.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Non-negative post age in fractional hours, clamped so a future-dated
/// record scores as brand new rather than negative.
pub(crate) fn age_hours(anchor: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - anchor).num_seconds().max(0) as f64) / 3600.0
}

/// Clamp a store counter to zero, logging the record as a data-quality
/// signal. A single dirty row must not abort the ranking pass.
pub(crate) fn clamp_count(value: i64, id: Uuid, field: &str) -> f64 {
    if value < 0 {
        warn!(%id, field, value, "negative engagement counter clamped to zero");
        0.0
    } else {
        value as f64
    }
}

pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one post against `now`.
    ///
    /// Likes and comments are log-dampened so a 1000-like post does not
    /// linearly dominate a 100-like one; recency decays linearly to zero
    /// across the configured window; the engagement term rewards posts that
    /// provoke discussion relative to passive likes. Every component is
    /// floored at zero and rounded to 2 decimals.
    pub fn score(&self, metrics: &PostMetrics, now: DateTime<Utc>) -> ScoreBreakdown {
        let w = &self.weights;

        let likes = clamp_count(metrics.like_count, metrics.id, "like_count");
        let comments = clamp_count(metrics.comment_count, metrics.id, "comment_count");
        let age = age_hours(metrics.effective_at, now);

        let likes_score = round2((likes + 1.0).ln() * w.likes_weight);
        let comments_score = round2((comments + 1.0).ln() * w.comments_weight);

        // Views proxy: the store keeps no real view counter.
        let estimated_views = (likes + comments) * w.view_estimate_factor;
        let views_score = round2((estimated_views + 1.0).ln() * w.views_weight);

        // Linear decay to zero over the window, never negative. A brand-new
        // post with zero engagement still gets this visibility floor.
        let recency_score =
            round2((w.recency_weight * (1.0 - age / w.recency_window_hours)).max(0.0));

        let interactions = likes + comments;
        let engagement_rate = if interactions > 0.0 {
            comments / interactions
        } else {
            0.0
        };
        let engagement_score = round2(engagement_rate * w.engagement_weight);

        let total_score = round2(
            likes_score + comments_score + views_score + recency_score + engagement_score,
        );

        ScoreBreakdown {
            post_id: metrics.id,
            total_score,
            likes_score,
            comments_score,
            views_score,
            recency_score,
            engagement_score,
            engagement_rate,
        }
    }
}

/// Concurrent score cache keyed by `(post_id, minute-truncated now)`.
///
/// Correctness never depends on a hit: a miss recomputes, and the whole map
/// can be dropped at will. Safe for concurrent readers and writers. Entries
/// from past minute buckets are evicted as the bucket advances, so the map
/// holds at most one entry per post scored in the current minute.
#[derive(Default)]
pub struct ScoreCache {
    entries: DashMap<(Uuid, i64), ScoreBreakdown>,
    bucket: AtomicI64,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(
        &self,
        engine: &ScoringEngine,
        metrics: &PostMetrics,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let minute = now.timestamp() / 60;
        self.evict_stale(minute);

        let key = (metrics.id, minute);
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        let breakdown = engine.score(metrics, now);
        self.entries.insert(key, breakdown.clone());
        breakdown
    }

    /// Drop entries from buckets older than `minute`. Racing scorers may
    /// both run the retain; stale entries are removed at most once and a
    /// concurrently evicted entry simply recomputes.
    fn evict_stale(&self, minute: i64) {
        let seen = self.bucket.load(Ordering::Acquire);
        if minute > seen
            && self
                .bucket
                .compare_exchange(seen, minute, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            self.entries.retain(|(_, bucket), _| *bucket >= minute);
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
