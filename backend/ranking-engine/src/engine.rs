//! Ranking Engine
//!
//! The call surface consumed by the presentation layer. Orchestrates one
//! store read followed by pure computation: popular and trending views,
//! the personalized feed, trending tags, and best comments. Requests share
//! no mutable state beyond the concurrent score cache, so any number can
//! run in parallel.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{
    CommentScore, RankedPost, TagFrequency, TimeWindow, UserPreferenceProfile,
};
use crate::services::{
    CommentRanker, LiveTagTrends, PersonalizedBlender, PreferenceProfiler, RankFilter, Ranker,
    ScoringEngine, TagTrendSource,
};
use crate::store::MetricsReader;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

pub struct RankingEngine<R: MetricsReader> {
    reader: R,
    ranker: Ranker,
    profiler: PreferenceProfiler,
    blender: PersonalizedBlender,
    comment_ranker: CommentRanker,
    tag_trends: LiveTagTrends,
    like_history_cap: usize,
    trending_window_hours: i64,
}

impl<R: MetricsReader> RankingEngine<R> {
    pub fn new(reader: R, config: EngineConfig) -> Self {
        let ranker = Ranker::new(
            ScoringEngine::new(config.scoring.clone()),
            config.trending.clone(),
        );
        Self {
            reader,
            ranker,
            blender: PersonalizedBlender::new(config.personalization.preference_boost),
            like_history_cap: config.personalization.like_history_cap,
            trending_window_hours: config.trending.window_hours,
            profiler: PreferenceProfiler::new(config.personalization),
            comment_ranker: CommentRanker::new(config.comments),
            tag_trends: LiveTagTrends::new(),
        }
    }

    /// Popularity view over the requested window/type filter.
    pub async fn get_popular(&self, filter: RankFilter) -> Result<Vec<RankedPost>> {
        let now = Utc::now();
        let candidates = self
            .reader
            .fetch_candidates(filter.window, filter.content_type)
            .await
            .map_err(EngineError::DataUnavailable)?;

        Ok(self.ranker.rank(&candidates, now, &filter))
    }

    /// Short-window, high-threshold view of disproportionate recent spikes.
    pub async fn get_trending(&self, limit: usize) -> Result<Vec<RankedPost>> {
        let now = Utc::now();
        // The store serves fixed-granularity windows; fetch the smallest one
        // containing the configured trending span and let the ranker apply
        // the tighter cut.
        let fetch_window = TimeWindow::covering_hours(self.trending_window_hours);
        let candidates = self
            .reader
            .fetch_candidates(fetch_window, None)
            .await
            .map_err(EngineError::DataUnavailable)?;

        Ok(self.ranker.rank_trending(&candidates, now, limit))
    }

    /// Personalized ordering for one user, offset-paginated. `page` is
    /// zero-based; no cursor state is retained between calls.
    pub async fn get_personalized_feed(
        &self,
        user_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Result<Vec<RankedPost>> {
        let now = Utc::now();
        let candidates = self
            .reader
            .fetch_candidates(TimeWindow::All, None)
            .await
            .map_err(EngineError::DataUnavailable)?;

        let profile = self.build_profile(user_id).await?;

        // Rank the full set first: blending re-weights, it never filters,
        // so pagination has to happen after the blend.
        let full = RankFilter::popular(TimeWindow::All, candidates.len());
        let ranked = self.ranker.rank(&candidates, now, &full);
        let blended = self.blender.blend(ranked, &profile);

        debug!(
            %user_id,
            page,
            limit,
            personalized = !profile.is_empty(),
            "personalized feed page served"
        );

        Ok(blended
            .into_iter()
            .skip(page.saturating_mul(limit))
            .take(limit)
            .collect())
    }

    /// Tag frequencies with short-term direction over a bounded window.
    pub async fn get_trending_tags(&self, window: TimeWindow) -> Result<Vec<TagFrequency>> {
        if window.duration().is_none() {
            return Err(EngineError::InvalidRequest(
                "tag trends require a bounded window".to_string(),
            ));
        }

        let now = Utc::now();
        let events = self
            .reader
            .fetch_tag_events(window)
            .await
            .map_err(EngineError::DataUnavailable)?;

        Ok(self.tag_trends.trending_tags(&events, window, now))
    }

    /// Best comments on one post.
    pub async fn get_best_comments(
        &self,
        post_id: Uuid,
        limit: usize,
    ) -> Result<Vec<CommentScore>> {
        let now = Utc::now();
        let comments = self
            .reader
            .fetch_comments(post_id)
            .await
            .map_err(EngineError::DataUnavailable)?;

        Ok(self.comment_ranker.rank(&comments, now, limit))
    }

    async fn build_profile(&self, user_id: Uuid) -> Result<UserPreferenceProfile> {
        let likes = self
            .reader
            .fetch_recent_likes(user_id, self.like_history_cap)
            .await
            .map_err(EngineError::DataUnavailable)?;
        Ok(self.profiler.profile(user_id, &likes))
    }
}
