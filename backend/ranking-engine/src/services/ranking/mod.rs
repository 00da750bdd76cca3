//! Ranking Layer
//!
//! Applies the scoring engine over a candidate set: window + content-type
//! selection, minimum-score cut, deterministic descending sort, truncation.
//! No side effects; candidates are never mutated.

use crate::config::TrendingConfig;
use crate::models::{ContentType, PostMetrics, RankedPost, TimeWindow};
use crate::services::scoring::{ScoreCache, ScoringEngine};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Selection parameters for one ranking pass.
#[derive(Debug, Clone)]
pub struct RankFilter {
    pub window: TimeWindow,
    /// `None` means all content types.
    pub content_type: Option<ContentType>,
    pub min_score: f64,
    pub limit: usize,
}

impl RankFilter {
    pub fn popular(window: TimeWindow, limit: usize) -> Self {
        Self {
            window,
            content_type: None,
            min_score: 0.0,
            limit,
        }
    }
}

pub struct Ranker {
    scorer: ScoringEngine,
    cache: ScoreCache,
    trending: TrendingConfig,
}

impl Ranker {
    pub fn new(scorer: ScoringEngine, trending: TrendingConfig) -> Self {
        Self {
            scorer,
            cache: ScoreCache::new(),
            trending,
        }
    }

    pub fn scorer(&self) -> &ScoringEngine {
        &self.scorer
    }

    /// Drop any cached breakdowns. Never required for correctness.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    /// Rank a candidate set.
    ///
    /// Guarantees: output length <= `filter.limit`, no duplicate post ids,
    /// every element's total score >= `filter.min_score`, sorted descending
    /// by total score with ties broken by more recent effective timestamp,
    /// then by id, so equal inputs always order identically.
    pub fn rank(
        &self,
        candidates: &[PostMetrics],
        now: DateTime<Utc>,
        filter: &RankFilter,
    ) -> Vec<RankedPost> {
        let lower_bound = filter.window.start(now);
        self.rank_bounded(candidates, now, lower_bound, filter)
    }

    /// Trending view: the same pipeline over a fixed short window with a
    /// higher score bar, surfacing disproportionate recent engagement rather
    /// than old posts still above the general threshold.
    pub fn rank_trending(
        &self,
        candidates: &[PostMetrics],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<RankedPost> {
        let filter = RankFilter {
            window: TimeWindow::All,
            content_type: None,
            min_score: self.trending.min_score,
            limit,
        };
        let lower_bound = Some(now - Duration::hours(self.trending.window_hours));
        self.rank_bounded(candidates, now, lower_bound, &filter)
    }

    fn rank_bounded(
        &self,
        candidates: &[PostMetrics],
        now: DateTime<Utc>,
        lower_bound: Option<DateTime<Utc>>,
        filter: &RankFilter,
    ) -> Vec<RankedPost> {
        let mut seen: HashSet<uuid::Uuid> = HashSet::with_capacity(candidates.len());

        let mut ranked: Vec<RankedPost> = candidates
            .iter()
            .filter(|m| lower_bound.map_or(true, |bound| m.effective_at >= bound))
            .filter(|m| filter.content_type.map_or(true, |ct| m.content_type == ct))
            .filter(|m| seen.insert(m.id))
            .map(|m| RankedPost {
                metrics: m.clone(),
                breakdown: self.cache.score(&self.scorer, m, now),
            })
            .filter(|r| r.breakdown.total_score >= filter.min_score)
            .collect();

        ranked.sort_by(compare_ranked);
        ranked.truncate(filter.limit);

        debug!(
            candidates = candidates.len(),
            window = filter.window.as_str(),
            min_score = filter.min_score,
            returned = ranked.len(),
            "ranking pass complete"
        );

        ranked
    }
}

/// Descending by total score; ties go to the more recent post, then id.
/// NaN cannot occur (all components are finite), but the comparison stays
/// NaN-safe the same way the sort in the scorer pipeline is.
fn compare_ranked(a: &RankedPost, b: &RankedPost) -> Ordering {
    b.breakdown
        .total_score
        .partial_cmp(&a.breakdown.total_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.metrics.effective_at.cmp(&a.metrics.effective_at))
        .then_with(|| a.metrics.id.cmp(&b.metrics.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringWeights;
    use uuid::Uuid;

    fn ranker() -> Ranker {
        Ranker::new(
            ScoringEngine::new(ScoringWeights::default()),
            TrendingConfig::default(),
        )
    }

    fn post(
        likes: i64,
        comments: i64,
        age_hours: i64,
        content_type: ContentType,
        now: DateTime<Utc>,
    ) -> PostMetrics {
        PostMetrics::new(
            Uuid::new_v4(),
            content_type,
            Uuid::new_v4(),
            likes,
            comments,
            0,
            now - Duration::hours(age_hours),
            None,
        )
    }

    #[test]
    fn empty_candidates_yield_empty_result() {
        let now = Utc::now();
        let out = ranker().rank(&[], now, &RankFilter::popular(TimeWindow::All, 10));
        assert!(out.is_empty());
    }

    #[test]
    fn output_sorted_bounded_and_above_min_score() {
        let now = Utc::now();
        let candidates: Vec<PostMetrics> = (0..20)
            .map(|i| post(i * 10, i, 2, ContentType::Recipe, now))
            .collect();

        let filter = RankFilter {
            window: TimeWindow::All,
            content_type: None,
            min_score: 30.0,
            limit: 5,
        };
        let out = ranker().rank(&candidates, now, &filter);

        assert!(out.len() <= 5);
        assert!(!out.is_empty());
        for pair in out.windows(2) {
            assert!(pair[0].total_score() >= pair[1].total_score());
        }
        for r in &out {
            assert!(r.total_score() >= 30.0);
        }

        let ids: HashSet<Uuid> = out.iter().map(|r| r.post_id()).collect();
        assert_eq!(ids.len(), out.len());
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let now = Utc::now();
        let original = post(50, 10, 1, ContentType::Tip, now);
        let duplicate = original.clone();

        let out = ranker().rank(
            &[original, duplicate],
            now,
            &RankFilter::popular(TimeWindow::All, 10),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn window_excludes_old_posts() {
        let now = Utc::now();
        let recent = post(10, 2, 3, ContentType::Recipe, now);
        let old = post(500, 100, 24 * 10, ContentType::Recipe, now);

        let out = ranker().rank(
            &[recent.clone(), old],
            now,
            &RankFilter::popular(TimeWindow::Day, 10),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].post_id(), recent.id);
    }

    #[test]
    fn content_type_filter_applies() {
        let now = Utc::now();
        let recipe = post(10, 2, 3, ContentType::Recipe, now);
        let question = post(10, 2, 3, ContentType::Question, now);

        let filter = RankFilter {
            window: TimeWindow::All,
            content_type: Some(ContentType::Question),
            min_score: 0.0,
            limit: 10,
        };
        let out = ranker().rank(&[recipe, question.clone()], now, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].post_id(), question.id);
    }

    #[test]
    fn ties_break_toward_more_recent() {
        let now = Utc::now();
        let newer = post(10, 5, 0, ContentType::Review, now);
        let older = PostMetrics::new(
            Uuid::new_v4(),
            ContentType::Review,
            Uuid::new_v4(),
            10,
            5,
            0,
            now - Duration::minutes(30),
            None,
        );
        // Same timestamp as `newer`, so an exact score tie.
        let twin = PostMetrics::new(
            Uuid::new_v4(),
            ContentType::Review,
            Uuid::new_v4(),
            10,
            5,
            0,
            newer.created_at,
            None,
        );

        let out = ranker().rank(
            &[older.clone(), newer.clone(), twin.clone()],
            now,
            &RankFilter::popular(TimeWindow::All, 10),
        );
        assert_eq!(out.len(), 3);
        // Both zero-age posts outrank the older one.
        assert_eq!(out[2].post_id(), older.id);
        // Equal-score, equal-timestamp twins order by id.
        let first_two: Vec<Uuid> = out[..2].iter().map(|r| r.post_id()).collect();
        let mut expected = vec![newer.id, twin.id];
        expected.sort();
        assert_eq!(first_two, expected);
    }

    #[test]
    fn trending_excludes_posts_outside_short_window() {
        let now = Utc::now();
        let spiking = post(200, 80, 2, ContentType::Recipe, now);
        let old_popular = post(2000, 800, 48, ContentType::Recipe, now);

        let out = ranker().rank_trending(&[spiking.clone(), old_popular], now, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].post_id(), spiking.id);
    }

    #[test]
    fn fresh_zero_engagement_post_misses_default_trending_bar() {
        // Visibility floor is recency alone (5.0), below the default 15.0
        // trending threshold.
        let now = Utc::now();
        let fresh = post(0, 0, 0, ContentType::Tip, now);

        let out = ranker().rank_trending(std::slice::from_ref(&fresh), now, 10);
        assert!(out.is_empty());

        // With the bar lowered to the recency weight, the same post trends.
        let lenient = Ranker::new(
            ScoringEngine::new(ScoringWeights::default()),
            TrendingConfig {
                window_hours: 6,
                min_score: 5.0,
            },
        );
        let out = lenient.rank_trending(&[fresh], now, 10);
        assert_eq!(out.len(), 1);
    }
}
