use crate::models::{CommentMetrics, ContentType, LikeEvent, PostMetrics, TagEvent, TimeWindow};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Read-only boundary to the content store.
///
/// The engine's only I/O: all reads complete before any ranking computation
/// begins. Implementations own connection handling and timeouts; the engine
/// maps any failure to [`crate::error::EngineError::DataUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsReader: Send + Sync {
    /// Engagement snapshots for posts whose effective timestamp falls within
    /// `window`, optionally restricted to one content type.
    async fn fetch_candidates(
        &self,
        window: TimeWindow,
        content_type: Option<ContentType>,
    ) -> Result<Vec<PostMetrics>>;

    /// A user's most recent like events, most-recent-first, at most `cap`.
    async fn fetch_recent_likes(&self, user_id: Uuid, cap: usize) -> Result<Vec<LikeEvent>>;

    /// All comments on one post.
    async fn fetch_comments(&self, post_id: Uuid) -> Result<Vec<CommentMetrics>>;

    /// Tag occurrences covering the current window and the preceding window
    /// of equal length (the trend tracker compares the two).
    async fn fetch_tag_events(&self, window: TimeWindow) -> Result<Vec<TagEvent>>;
}
