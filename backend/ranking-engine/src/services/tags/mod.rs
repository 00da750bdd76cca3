//! Tag Trend Tracker
//!
//! Windowed frequency counts over the raw tag-engagement stream, with a
//! short-term direction per tag from comparing the active window against the
//! immediately preceding window of equal length.

use crate::models::{TagEvent, TagFrequency, TagTrend, TimeWindow};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::warn;

/// Source of trending-tag data.
///
/// The live implementation computes from the engagement stream; the static
/// variant exists only as a fixed-response placeholder and announces itself
/// in the logs so operators never mistake its output for live trends.
pub trait TagTrendSource: Send + Sync {
    fn trending_tags(
        &self,
        events: &[TagEvent],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Vec<TagFrequency>;
}

#[derive(Default)]
pub struct TagTrendTracker;

impl TagTrendTracker {
    pub fn new() -> Self {
        Self
    }

    /// Count tags in `[now - w, now)` and classify each against its count in
    /// `[now - 2w, now - w)`. A tag with no prior-window data is `Up` by
    /// convention (it went from zero to something). Tags absent from the
    /// active window are not reported. Sorted by count descending, ties by
    /// tag name for a deterministic order.
    pub fn compute(
        &self,
        events: &[TagEvent],
        window_length: Duration,
        now: DateTime<Utc>,
    ) -> Vec<TagFrequency> {
        let current_start = now - window_length;
        let previous_start = current_start - window_length;

        let mut current: HashMap<&str, u64> = HashMap::new();
        let mut previous: HashMap<&str, u64> = HashMap::new();

        for event in events {
            if event.timestamp >= current_start && event.timestamp < now {
                *current.entry(event.tag.as_str()).or_insert(0) += 1;
            } else if event.timestamp >= previous_start && event.timestamp < current_start {
                *previous.entry(event.tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut frequencies: Vec<TagFrequency> = current
            .into_iter()
            .map(|(tag, count)| {
                let prior = previous.get(tag).copied().unwrap_or(0);
                let trend = match count.cmp(&prior) {
                    std::cmp::Ordering::Greater => TagTrend::Up,
                    std::cmp::Ordering::Less => TagTrend::Down,
                    std::cmp::Ordering::Equal => TagTrend::Flat,
                };
                TagFrequency {
                    tag: tag.to_string(),
                    count,
                    trend,
                }
            })
            .collect();

        frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        frequencies
    }
}

/// Live windowed computation; the shipped default.
#[derive(Default)]
pub struct LiveTagTrends {
    tracker: TagTrendTracker,
}

impl LiveTagTrends {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TagTrendSource for LiveTagTrends {
    fn trending_tags(
        &self,
        events: &[TagEvent],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Vec<TagFrequency> {
        let Some(length) = window.duration() else {
            // Callers gate on a bounded window before reaching here.
            return Vec::new();
        };
        self.tracker.compute(events, length, now)
    }
}

/// Fixed-response placeholder kept only for environments where the tag
/// stream is not wired up yet. Not live data.
pub struct StaticTagTrends {
    tags: Vec<TagFrequency>,
}

impl StaticTagTrends {
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| TagFrequency {
                    tag,
                    count: 0,
                    trend: TagTrend::Flat,
                })
                .collect(),
        }
    }
}

impl TagTrendSource for StaticTagTrends {
    fn trending_tags(
        &self,
        _events: &[TagEvent],
        window: TimeWindow,
        _now: DateTime<Utc>,
    ) -> Vec<TagFrequency> {
        warn!(
            window = window.as_str(),
            "trending tags served from static placeholder list, not live data"
        );
        self.tags.clone()
    }
}
