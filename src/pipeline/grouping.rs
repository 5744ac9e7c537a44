// src/pipeline/grouping.rs
//! Partition a list into the six pipeline columns.

use std::collections::BTreeMap;

use super::{map_status_to_stage, Listable, Stage};

/// Bucket items by stage. All six stages are always present, in column order.
pub fn group_by_stage<T>(items: &[T]) -> BTreeMap<Stage, Vec<T>>
where
    T: Listable + Clone,
{
    let mut columns: BTreeMap<Stage, Vec<T>> =
        Stage::ALL.into_iter().map(|stage| (stage, Vec::new())).collect();

    for item in items {
        columns
            .entry(map_status_to_stage(item.status()))
            .or_default()
            .push(item.clone());
    }

    columns
}
