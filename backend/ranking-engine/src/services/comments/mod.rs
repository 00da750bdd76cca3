//! Comment Ranker
//!
//! Surfaces the best comments on a single post with a smaller linear formula:
//! likes and replies weigh in directly, a length band rewards substantive
//! comments while zeroing out one-liners and walls of text, and a mild
//! recency term breaks the monotony of old winners.

use crate::config::CommentWeights;
use crate::models::{CommentMetrics, CommentScore};
use crate::services::scoring::{age_hours, clamp_count, round2};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

pub struct CommentRanker {
    weights: CommentWeights,
}

impl CommentRanker {
    pub fn new(weights: CommentWeights) -> Self {
        Self { weights }
    }

    /// Score, sort descending, truncate. Pure and deterministic; an empty
    /// input yields an empty output.
    pub fn rank(
        &self,
        comments: &[CommentMetrics],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<CommentScore> {
        let mut scored: Vec<(CommentScore, DateTime<Utc>)> = comments
            .iter()
            .map(|c| (self.score(c, now), c.created_at))
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_score
                .partial_cmp(&a.0.total_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.0.comment_id.cmp(&b.0.comment_id))
        });
        scored.truncate(limit);
        scored.into_iter().map(|(score, _)| score).collect()
    }

    pub fn score(&self, comment: &CommentMetrics, now: DateTime<Utc>) -> CommentScore {
        let w = &self.weights;

        let likes = clamp_count(comment.like_count, comment.id, "like_count");
        let replies = clamp_count(comment.reply_count, comment.id, "reply_count");

        let likes_score = round2(likes * w.likes_weight);
        let replies_score = round2(replies * w.replies_weight);

        // Out-of-band lengths score zero rather than being scaled down: a
        // 600-character wall is excluded, not merely discounted.
        let length = comment.content_length;
        let length_score = if length >= w.min_length && length <= w.max_length {
            round2((length as f64 / w.length_divisor).min(w.length_cap))
        } else {
            0.0
        };

        let age = age_hours(comment.created_at, now);
        let recency_score = round2((w.recency_base - age / w.recency_decay_hours).max(0.0));

        let total_score = round2(likes_score + replies_score + length_score + recency_score);

        CommentScore {
            comment_id: comment.id,
            total_score,
            likes_score,
            replies_score,
            length_score,
            recency_score,
        }
    }
}
