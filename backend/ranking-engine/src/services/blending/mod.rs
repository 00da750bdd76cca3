//! Personalized Blender
//!
//! Re-orders an already-ranked result set using a user's preference profile.
//! Pure re-weighting layer: it queries nothing, drops nothing, and never
//! mutates a score field on the posts themselves.

use crate::models::{RankedPost, UserPreferenceProfile};
use std::cmp::Ordering;
use tracing::debug;

pub struct PersonalizedBlender {
    /// Flat multiplier for posts whose content type is preferred. Flat (not
    /// additive) so relative order within the preferred group is preserved,
    /// while a strong unpreferred post can still outrank a weak preferred one.
    boost: f64,
}

impl PersonalizedBlender {
    pub fn new(boost: f64) -> Self {
        Self { boost }
    }

    /// Re-sort `ranked` by boosted score.
    ///
    /// The adjusted score lives only in a transient pair for the duration of
    /// the sort; the returned posts carry their original breakdowns, so there
    /// is never ambiguity about which score is authoritative. An empty
    /// profile means no signal: the input comes back untouched.
    pub fn blend(
        &self,
        ranked: Vec<RankedPost>,
        profile: &UserPreferenceProfile,
    ) -> Vec<RankedPost> {
        if profile.is_empty() {
            return ranked;
        }

        let mut adjusted: Vec<(RankedPost, f64)> = ranked
            .into_iter()
            .map(|post| {
                let boosted = profile.preferred_types.contains(&post.metrics.content_type);
                let score = if boosted {
                    post.total_score() * self.boost
                } else {
                    post.total_score()
                };
                (post, score)
            })
            .collect();

        // Stable sort: equal adjusted scores keep their incoming order.
        adjusted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        debug!(
            user_id = %profile.user_id,
            sample_size = profile.sample_size,
            posts = adjusted.len(),
            "personalized blend applied"
        );

        adjusted.into_iter().map(|(post, _)| post).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, PostMetrics, ScoreBreakdown};
    use chrono::Utc;
    use uuid::Uuid;

    fn ranked(content_type: ContentType, total: f64) -> RankedPost {
        let id = Uuid::new_v4();
        RankedPost {
            metrics: PostMetrics::new(
                id,
                content_type,
                Uuid::new_v4(),
                10,
                2,
                0,
                Utc::now(),
                None,
            ),
            breakdown: ScoreBreakdown {
                post_id: id,
                total_score: total,
                likes_score: total,
                comments_score: 0.0,
                views_score: 0.0,
                recency_score: 0.0,
                engagement_score: 0.0,
                engagement_rate: 0.0,
            },
        }
    }

    fn profile_preferring(types: Vec<ContentType>) -> UserPreferenceProfile {
        UserPreferenceProfile {
            user_id: Uuid::new_v4(),
            preferred_types: types,
            preferred_authors: vec![],
            sample_size: 42,
        }
    }

    #[test]
    fn empty_profile_is_identity() {
        let posts = vec![
            ranked(ContentType::Recipe, 50.0),
            ranked(ContentType::Question, 40.0),
            ranked(ContentType::Tip, 30.0),
        ];
        let order_before: Vec<Uuid> = posts.iter().map(|p| p.post_id()).collect();

        let blender = PersonalizedBlender::new(1.5);
        let out = blender.blend(posts, &UserPreferenceProfile::empty(Uuid::new_v4()));

        let order_after: Vec<Uuid> = out.iter().map(|p| p.post_id()).collect();
        assert_eq!(order_before, order_after);
    }

    #[test]
    fn preferred_type_rises_past_similar_unpreferred_post() {
        let preferred = ranked(ContentType::Question, 40.0);
        let unpreferred = ranked(ContentType::Recipe, 50.0);
        let preferred_id = preferred.post_id();

        let blender = PersonalizedBlender::new(1.5);
        let out = blender.blend(
            vec![unpreferred, preferred],
            &profile_preferring(vec![ContentType::Question]),
        );

        // 40 * 1.5 = 60 beats 50.
        assert_eq!(out[0].post_id(), preferred_id);
        // Original breakdown untouched.
        assert_eq!(out[0].total_score(), 40.0);
    }

    #[test]
    fn boost_does_not_reorder_within_preferred_group() {
        let high = ranked(ContentType::Tip, 80.0);
        let low = ranked(ContentType::Tip, 20.0);
        let high_id = high.post_id();

        let blender = PersonalizedBlender::new(1.5);
        let out = blender.blend(vec![high, low], &profile_preferring(vec![ContentType::Tip]));
        assert_eq!(out[0].post_id(), high_id);
    }

    #[test]
    fn much_stronger_unpreferred_post_still_wins() {
        let weak_preferred = ranked(ContentType::Review, 10.0);
        let strong_unpreferred = ranked(ContentType::Recipe, 90.0);
        let strong_id = strong_unpreferred.post_id();

        let blender = PersonalizedBlender::new(1.5);
        let out = blender.blend(
            vec![weak_preferred, strong_unpreferred],
            &profile_preferring(vec![ContentType::Review]),
        );
        assert_eq!(out[0].post_id(), strong_id);
    }
}
