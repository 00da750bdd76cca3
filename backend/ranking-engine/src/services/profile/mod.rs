//! Preference Profiler
//!
//! Derives a per-user interest summary (favored content types and authors)
//! from recent like history. The profile only ever re-weights ranked results
//! downstream; it never filters anything out.

use crate::config::PersonalizationConfig;
use crate::models::{LikeEvent, UserPreferenceProfile};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use uuid::Uuid;

pub struct PreferenceProfiler {
    config: PersonalizationConfig,
}

impl PreferenceProfiler {
    pub fn new(config: PersonalizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PersonalizationConfig {
        &self.config
    }

    /// Build a profile from like events supplied most-recent-first.
    ///
    /// Types and authors are tallied independently, sorted by frequency, and
    /// capped. Count ties resolve by first appearance in the input, so the
    /// result is deterministic for identical input order. Zero events yield
    /// an empty profile, which downstream treats as "no signal", not an error.
    pub fn profile(&self, user_id: Uuid, recent_likes: &[LikeEvent]) -> UserPreferenceProfile {
        if recent_likes.is_empty() {
            return UserPreferenceProfile::empty(user_id);
        }

        let preferred_types = top_by_frequency(
            recent_likes.iter().map(|e| e.content_type),
            self.config.preferred_type_cap,
        );
        let preferred_authors = top_by_frequency(
            recent_likes.iter().map(|e| e.author_id),
            self.config.preferred_author_cap,
        );

        debug!(
            %user_id,
            sample_size = recent_likes.len(),
            types = preferred_types.len(),
            authors = preferred_authors.len(),
            "preference profile built"
        );

        UserPreferenceProfile {
            user_id,
            preferred_types,
            preferred_authors,
            sample_size: recent_likes.len(),
        }
    }
}

/// Tally an iterator of keys and return the `cap` most frequent, ties broken
/// by first-seen position.
fn top_by_frequency<K>(keys: impl Iterator<Item = K>, cap: usize) -> Vec<K>
where
    K: Copy + Eq + Hash,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (position, key) in keys.enumerate() {
        let entry = counts.entry(key).or_insert((0, position));
        entry.0 += 1;
    }

    let mut tallies: Vec<(K, usize, usize)> = counts
        .into_iter()
        .map(|(key, (count, first_seen))| (key, count, first_seen))
        .collect();
    tallies.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    tallies.into_iter().take(cap).map(|(key, _, _)| key).collect()
}
