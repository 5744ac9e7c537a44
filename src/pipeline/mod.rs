// src/pipeline/mod.rs
//! Pure, synchronous collection transforms behind every list screen.
//!
//! Data flows one way: raw list -> [`filter_entities`] -> [`sort_entities`] ->
//! [`compute_stats`] or [`group_by_stage`]. None of these mutate their input
//! and none can fail.

pub mod filter;
pub mod grouping;
pub mod sort;
pub mod stage;
pub mod stats;

pub use filter::{filter_entities, FilterOptions, StatusFilter};
pub use grouping::group_by_stage;
pub use sort::{sort_entities, SortKey};
pub use stage::{map_stage_to_status, map_status_to_stage, Stage};
pub use stats::{compute_stats, CollectionStats, JobStats};

use chrono::{DateTime, Utc};

/// An entity that can flow through the collection pipeline.
pub trait Listable {
    /// Backend status string, as received.
    fn status(&self) -> &str;

    /// Key used by [`SortKey::Name`].
    fn sort_name(&self) -> &str;

    /// Key used by [`SortKey::Recent`]; `None` sorts last.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Fields scanned by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    fn match_score(&self) -> Option<f64> {
        None
    }

    /// Match score with absent or non-finite values read as zero.
    fn score_or_zero(&self) -> f64 {
        match self.match_score() {
            Some(score) if score.is_finite() => score,
            _ => 0.0,
        }
    }
}
