//! Content popularity & personalization ranking engine.
//!
//! Scores user-generated posts by popularity, detects short-term trending
//! content and tags, and produces a personalized feed ordering per user.
//! All computation is pure over in-memory snapshots; the only I/O is the
//! [`store::MetricsReader`] read boundary to the content store.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::EngineConfig;
pub use engine::RankingEngine;
pub use error::{EngineError, Result};
pub use services::{
    CommentRanker, PersonalizedBlender, PreferenceProfiler, RankFilter, Ranker, ScoringEngine,
    TagTrendTracker,
};
pub use store::MetricsReader;
