// src/pipeline/sort.rs
//! Stable ordering of a list by recency, match score or name.

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::Listable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Recent,
    /// Highest score first; a missing score counts as zero.
    MatchScore,
    /// Alphabetical by locale collation, ignoring case.
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::MatchScore => "match_score",
            SortKey::Name => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Recent => "Most Recent",
            SortKey::MatchScore => "Match Score",
            SortKey::Name => "Name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "recent" => Ok(SortKey::Recent),
            "match_score" | "score" => Ok(SortKey::MatchScore),
            "name" => Ok(SortKey::Name),
            other => Err(format!(
                "Unknown sort key '{}'. Use recent, match_score or name",
                other
            )),
        }
    }
}

/// Return a sorted copy of `items`. Ties keep their input order.
pub fn sort_entities<T>(items: &[T], key: SortKey) -> Vec<T>
where
    T: Listable + Clone,
{
    let mut sorted = items.to_vec();
    // `sort_by` is a stable merge sort
    match key {
        SortKey::Recent => sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp())),
        SortKey::MatchScore => sorted.sort_by(|a, b| {
            b.score_or_zero()
                .partial_cmp(&a.score_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Name => match name_collator() {
            Some(collator) => {
                sorted.sort_by(|a, b| collator.compare(a.sort_name(), b.sort_name()))
            }
            None => sorted.sort_by_cached_key(|item| item.sort_name().to_lowercase()),
        },
    }
    sorted
}

/// Root-locale collator at secondary strength: accents count, case does not.
fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Collator unavailable, sorting names by code point: {}", e);
            None
        }
    }
}
