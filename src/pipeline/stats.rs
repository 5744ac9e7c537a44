// src/pipeline/stats.rs
//! Summary figures shown above applicant and job lists.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Listable;
use crate::types::{Job, JobStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    /// Count per status value exactly as received.
    pub by_status: BTreeMap<String, usize>,
    /// Mean match score rounded to the nearest integer; 0 for an empty list.
    pub avg_match_score: i64,
}

impl CollectionStats {
    pub fn count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

pub fn compute_stats<T: Listable>(items: &[T]) -> CollectionStats {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut score_sum = 0.0;

    for item in items {
        *by_status.entry(item.status().to_string()).or_default() += 1;
        score_sum += item.score_or_zero();
    }

    let avg_match_score = if items.is_empty() {
        0
    } else {
        (score_sum / items.len() as f64).round() as i64
    };

    CollectionStats {
        total: items.len(),
        by_status,
        avg_match_score,
    }
}

/// Totals for the employer's job management screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub closed: usize,
    pub total_views: i64,
    pub total_applications: i64,
}

impl JobStats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        jobs.iter().fold(
            JobStats {
                total: jobs.len(),
                ..Default::default()
            },
            |mut stats, job| {
                match job.job_status() {
                    Some(JobStatus::Published) => stats.published += 1,
                    Some(JobStatus::Draft) => stats.draft += 1,
                    Some(JobStatus::Closed) => stats.closed += 1,
                    None => {}
                }
                stats.total_views += job.views_count;
                stats.total_applications += job.applications_count;
                stats
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{applicant, job, scored};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_list() {
        let stats = compute_stats::<crate::types::Applicant>(&[]);
        assert_eq!(
            stats,
            CollectionStats {
                total: 0,
                by_status: BTreeMap::new(),
                avg_match_score: 0,
            }
        );
    }

    #[test]
    fn test_counts_every_observed_status() {
        let items = vec![
            applicant(1, "a", "pending"),
            applicant(2, "b", "pending"),
            applicant(3, "c", "on_hold"),
            applicant(4, "d", "accepted"),
        ];
        let stats = compute_stats(&items);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count("pending"), 2);
        assert_eq!(stats.count("on_hold"), 1);
        assert_eq!(stats.count("accepted"), 1);
        assert_eq!(stats.count("reviewed"), 0);
        assert_eq!(stats.by_status.len(), 3);
    }

    #[test]
    fn test_average_treats_missing_as_zero_and_rounds() {
        let items = vec![
            scored(1, "a", 90.0),
            scored(2, "b", 81.0),
            applicant(3, "c", "pending"),
        ];
        // (90 + 81 + 0) / 3 = 57
        assert_eq!(compute_stats(&items).avg_match_score, 57);

        let halves = vec![scored(1, "a", 70.0), scored(2, "b", 71.0)];
        // 70.5 rounds up
        assert_eq!(compute_stats(&halves).avg_match_score, 71);
    }

    #[test]
    fn test_job_stats() {
        let mut published = job(1, "Engineer", "published");
        published.views_count = 120;
        published.applications_count = 8;
        let mut draft = job(2, "Designer", "draft");
        draft.views_count = 3;
        let closed = job(3, "Analyst", "closed");

        let stats = JobStats::from_jobs(&[published, draft, closed]);
        assert_eq!(
            stats,
            JobStats {
                total: 3,
                published: 1,
                draft: 1,
                closed: 1,
                total_views: 123,
                total_applications: 8,
            }
        );
    }
}
