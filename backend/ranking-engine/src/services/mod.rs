pub mod blending;
pub mod comments;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod tags;

pub use blending::PersonalizedBlender;
pub use comments::CommentRanker;
pub use profile::PreferenceProfiler;
pub use ranking::{RankFilter, Ranker};
pub use scoring::{ScoreCache, ScoringEngine};
pub use tags::{LiveTagTrends, StaticTagTrends, TagTrendSource, TagTrendTracker};
