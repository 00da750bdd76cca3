use serde::Deserialize;
use std::env;

/// Weights for the post popularity formula.
///
/// Injected into [`crate::services::ScoringEngine`] at construction so tests
/// can run alternate weight sets without touching process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier on ln(likes + 1).
    pub likes_weight: f64,
    /// Multiplier on ln(comments + 1). Higher than likes: a comment signals
    /// deeper engagement than a like.
    pub comments_weight: f64,
    /// Multiplier on ln(estimated_views + 1).
    pub views_weight: f64,
    /// Views proxy: (likes + comments) * this factor. Used only because the
    /// store keeps no real view counter.
    pub view_estimate_factor: f64,
    /// Score of a zero-age post; decays linearly to zero over the window.
    pub recency_weight: f64,
    /// Length of the linear recency decay, in hours.
    pub recency_window_hours: f64,
    /// Multiplier on the comment share of likes+comments.
    pub engagement_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            likes_weight: 10.0,
            comments_weight: 15.0,
            views_weight: 2.0,
            view_estimate_factor: 10.0,
            recency_weight: 5.0,
            recency_window_hours: 24.0 * 7.0,
            engagement_weight: 20.0,
        }
    }
}

/// Weights for the comment scoring formula.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentWeights {
    pub likes_weight: f64,
    pub replies_weight: f64,
    /// Comments shorter than this score zero length points.
    pub min_length: usize,
    /// Comments longer than this score zero length points.
    pub max_length: usize,
    pub length_divisor: f64,
    pub length_cap: f64,
    /// Score of a zero-age comment.
    pub recency_base: f64,
    /// Hours of age that cost one recency point.
    pub recency_decay_hours: f64,
}

impl Default for CommentWeights {
    fn default() -> Self {
        Self {
            likes_weight: 10.0,
            replies_weight: 5.0,
            min_length: 20,
            max_length: 500,
            length_divisor: 10.0,
            length_cap: 20.0,
            recency_base: 10.0,
            recency_decay_hours: 24.0,
        }
    }
}

/// Full engine configuration: formula weights plus view thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub comments: CommentWeights,
    pub trending: TrendingConfig,
    pub personalization: PersonalizationConfig,
}

/// Thresholds for the short-window trending view.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingConfig {
    /// Fixed short window for the trending view, in hours.
    pub window_hours: i64,
    /// Posts below this total score never trend.
    pub min_score: f64,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            window_hours: 6,
            min_score: 15.0,
        }
    }
}

/// Caps and boost for preference-based re-ranking.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalizationConfig {
    /// Top content types kept in a profile.
    pub preferred_type_cap: usize,
    /// Top authors kept in a profile.
    pub preferred_author_cap: usize,
    /// Flat multiplier applied to preferred-type posts when blending.
    pub preference_boost: f64,
    /// Like events fetched per profile build.
    pub like_history_cap: usize,
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            preferred_type_cap: 3,
            preferred_author_cap: 5,
            preference_boost: 1.5,
            like_history_cap: 100,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment, falling back to defaults so a
    /// bare environment yields the canonical ranking behavior.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            scoring: ScoringWeights {
                likes_weight: env_f64("RANKING_LIKES_WEIGHT", d.scoring.likes_weight),
                comments_weight: env_f64("RANKING_COMMENTS_WEIGHT", d.scoring.comments_weight),
                views_weight: env_f64("RANKING_VIEWS_WEIGHT", d.scoring.views_weight),
                view_estimate_factor: env_f64(
                    "RANKING_VIEW_ESTIMATE_FACTOR",
                    d.scoring.view_estimate_factor,
                ),
                recency_weight: env_f64("RANKING_RECENCY_WEIGHT", d.scoring.recency_weight),
                recency_window_hours: env_f64(
                    "RANKING_RECENCY_WINDOW_HOURS",
                    d.scoring.recency_window_hours,
                ),
                engagement_weight: env_f64(
                    "RANKING_ENGAGEMENT_WEIGHT",
                    d.scoring.engagement_weight,
                ),
            },
            comments: CommentWeights {
                likes_weight: env_f64("COMMENT_LIKES_WEIGHT", d.comments.likes_weight),
                replies_weight: env_f64("COMMENT_REPLIES_WEIGHT", d.comments.replies_weight),
                min_length: env_usize("COMMENT_MIN_LENGTH", d.comments.min_length),
                max_length: env_usize("COMMENT_MAX_LENGTH", d.comments.max_length),
                length_divisor: env_f64("COMMENT_LENGTH_DIVISOR", d.comments.length_divisor),
                length_cap: env_f64("COMMENT_LENGTH_CAP", d.comments.length_cap),
                recency_base: env_f64("COMMENT_RECENCY_BASE", d.comments.recency_base),
                recency_decay_hours: env_f64(
                    "COMMENT_RECENCY_DECAY_HOURS",
                    d.comments.recency_decay_hours,
                ),
            },
            trending: TrendingConfig {
                window_hours: env_i64("TRENDING_WINDOW_HOURS", d.trending.window_hours),
                min_score: env_f64("TRENDING_MIN_SCORE", d.trending.min_score),
            },
            personalization: PersonalizationConfig {
                preferred_type_cap: env_usize(
                    "PREFERRED_TYPE_CAP",
                    d.personalization.preferred_type_cap,
                ),
                preferred_author_cap: env_usize(
                    "PREFERRED_AUTHOR_CAP",
                    d.personalization.preferred_author_cap,
                ),
                preference_boost: env_f64(
                    "PREFERENCE_BOOST",
                    d.personalization.preference_boost,
                ),
                like_history_cap: env_usize(
                    "LIKE_HISTORY_CAP",
                    d.personalization.like_history_cap,
                ),
            },
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid f64")))
        .unwrap_or(default)
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid i64")))
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid usize")))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let config = EngineConfig::default();
        assert_eq!(config.scoring.likes_weight, 10.0);
        assert_eq!(config.scoring.comments_weight, 15.0);
        assert_eq!(config.scoring.recency_weight, 5.0);
        assert_eq!(config.scoring.recency_window_hours, 168.0);
        assert_eq!(config.trending.window_hours, 6);
        assert_eq!(config.trending.min_score, 15.0);
        assert_eq!(config.personalization.preference_boost, 1.5);
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        // No RANKING_* vars set in the test environment.
        let config = EngineConfig::from_env();
        assert_eq!(config.scoring.engagement_weight, 20.0);
        assert_eq!(config.comments.min_length, 20);
        assert_eq!(config.comments.max_length, 500);
    }
}
