use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content categories served by the content store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContentType {
    Recipe,
    Review,
    Tip,
    Question,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Recipe => "recipe",
            ContentType::Review => "review",
            ContentType::Tip => "tip",
            ContentType::Question => "question",
        }
    }
}

/// Query windows understood by the store and the ranker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::All => "all",
        }
    }

    /// Window length, `None` for the unbounded window.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            TimeWindow::Day => Some(Duration::hours(24)),
            TimeWindow::Week => Some(Duration::days(7)),
            TimeWindow::Month => Some(Duration::days(30)),
            TimeWindow::All => None,
        }
    }

    /// Inclusive lower bound for this window ending at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|d| now - d)
    }

    /// Smallest store window that contains a span of `hours`.
    pub fn covering_hours(hours: i64) -> Self {
        match hours {
            h if h <= 24 => TimeWindow::Day,
            h if h <= 24 * 7 => TimeWindow::Week,
            h if h <= 24 * 30 => TimeWindow::Month,
            _ => TimeWindow::All,
        }
    }
}

/// Immutable engagement snapshot for one post, as read from the content store.
///
/// Counters come straight from store columns and may be dirty (negative after
/// a botched backfill); scoring clamps them rather than rejecting the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetrics {
    pub id: Uuid,
    pub content_type: ContentType,
    pub author_id: Uuid,
    pub like_count: i64,
    pub comment_count: i64,
    pub bookmark_count: i64,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    /// Age anchor: `published_at` when present, else `created_at`.
    /// Resolved once at construction so no formula site re-derives it.
    pub effective_at: DateTime<Utc>,
}

impl PostMetrics {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        content_type: ContentType,
        author_id: Uuid,
        like_count: i64,
        comment_count: i64,
        bookmark_count: i64,
        created_at: DateTime<Utc>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            content_type,
            author_id,
            like_count,
            comment_count,
            bookmark_count,
            created_at,
            published_at,
            effective_at: published_at.unwrap_or(created_at),
        }
    }
}

/// Per-component popularity score for one post.
///
/// Recomputed on every ranking pass; cacheable but never authoritative state.
/// Components are kept so callers can explain why a post ranked where it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub post_id: Uuid,
    pub total_score: f64,
    pub likes_score: f64,
    pub comments_score: f64,
    pub views_score: f64,
    pub recency_score: f64,
    pub engagement_score: f64,
    /// Fraction of likes+comments that are comments, in [0, 1].
    pub engagement_rate: f64,
}

/// A post paired with the breakdown that placed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPost {
    pub metrics: PostMetrics,
    pub breakdown: ScoreBreakdown,
}

impl RankedPost {
    pub fn post_id(&self) -> Uuid {
        self.metrics.id
    }

    pub fn total_score(&self) -> f64 {
        self.breakdown.total_score
    }
}

/// One positive-engagement event from a user's recent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEvent {
    pub content_type: ContentType,
    pub author_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Lightweight interest summary derived from recent likes.
///
/// Ephemeral: computed per personalization request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferenceProfile {
    pub user_id: Uuid,
    /// Most-liked-first, capped.
    pub preferred_types: Vec<ContentType>,
    /// Most-liked-first, capped.
    pub preferred_authors: Vec<Uuid>,
    /// Number of like events the profile was derived from.
    pub sample_size: usize,
}

impl UserPreferenceProfile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            preferred_types: Vec::new(),
            preferred_authors: Vec::new(),
            sample_size: 0,
        }
    }

    /// No signal: callers skip personalization entirely.
    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }
}

/// One tag occurrence on the raw engagement stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagEvent {
    pub tag: String,
    pub timestamp: DateTime<Utc>,
}

/// Short-term direction of a tag across adjacent windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TagTrend {
    Up,
    Down,
    Flat,
}

/// A tag's frequency within the active window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagFrequency {
    pub tag: String,
    pub count: u64,
    pub trend: TagTrend,
}

/// Engagement snapshot for one comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentMetrics {
    pub id: Uuid,
    pub post_id: Uuid,
    pub like_count: i64,
    pub reply_count: i64,
    pub content_length: usize,
    pub created_at: DateTime<Utc>,
}

/// Scored comment with its component scores, mirroring [`ScoreBreakdown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentScore {
    pub comment_id: Uuid,
    pub total_score: f64,
    pub likes_score: f64,
    pub replies_score: f64,
    pub length_score: f64,
    pub recency_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_timestamp_prefers_published_at() {
        let created = Utc::now() - Duration::hours(48);
        let published = Utc::now() - Duration::hours(2);

        let with_publish = PostMetrics::new(
            Uuid::new_v4(),
            ContentType::Recipe,
            Uuid::new_v4(),
            0,
            0,
            0,
            created,
            Some(published),
        );
        assert_eq!(with_publish.effective_at, published);

        let without_publish = PostMetrics::new(
            Uuid::new_v4(),
            ContentType::Recipe,
            Uuid::new_v4(),
            0,
            0,
            0,
            created,
            None,
        );
        assert_eq!(without_publish.effective_at, created);
    }

    #[test]
    fn window_bounds() {
        let now = Utc::now();
        assert_eq!(TimeWindow::Day.start(now), Some(now - Duration::hours(24)));
        assert_eq!(TimeWindow::Week.start(now), Some(now - Duration::days(7)));
        assert_eq!(TimeWindow::All.start(now), None);
    }

    #[test]
    fn covering_window_picks_smallest_fit() {
        assert_eq!(TimeWindow::covering_hours(6), TimeWindow::Day);
        assert_eq!(TimeWindow::covering_hours(24), TimeWindow::Day);
        assert_eq!(TimeWindow::covering_hours(48), TimeWindow::Week);
        assert_eq!(TimeWindow::covering_hours(24 * 20), TimeWindow::Month);
        assert_eq!(TimeWindow::covering_hours(24 * 90), TimeWindow::All);
    }

    #[test]
    fn ranked_post_serializes() {
        let metrics = PostMetrics::new(
            Uuid::new_v4(),
            ContentType::Tip,
            Uuid::new_v4(),
            3,
            1,
            0,
            Utc::now(),
            None,
        );
        let ranked = RankedPost {
            breakdown: ScoreBreakdown {
                post_id: metrics.id,
                total_score: 12.34,
                likes_score: 1.0,
                comments_score: 2.0,
                views_score: 3.0,
                recency_score: 4.0,
                engagement_score: 2.34,
                engagement_rate: 0.25,
            },
            metrics,
        };

        let json = serde_json::to_string(&ranked).expect("serialize");
        assert!(json.contains("\"total_score\":12.34"));
    }
}
