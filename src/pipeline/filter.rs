// src/pipeline/filter.rs
//! Status filter and free-text search over a list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Listable;
use crate::utils::normalize_query;

/// Which statuses a list screen shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Status(String),
}

impl StatusFilter {
    pub fn status(status: impl Into<String>) -> Self {
        StatusFilter::Status(status.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, StatusFilter::All)
    }

    fn accepts(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(wanted) => status.to_lowercase() == wanted.to_lowercase(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Status(s.to_string()))
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Status(status) => f.write_str(status),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub status_filter: StatusFilter,
    pub search_query: String,
}

impl FilterOptions {
    pub fn new(status_filter: StatusFilter, search_query: impl Into<String>) -> Self {
        Self {
            status_filter,
            search_query: search_query.into(),
        }
    }

    /// True when neither the status filter nor the search narrows the list.
    pub fn is_passthrough(&self) -> bool {
        self.status_filter.is_all() && normalize_query(&self.search_query).is_empty()
    }
}

/// Keep items passing both the status filter and the search query.
///
/// The search matches when the lower-cased query is a substring of any of the
/// item's searchable fields.
pub fn filter_entities<T>(items: &[T], options: &FilterOptions) -> Vec<T>
where
    T: Listable + Clone,
{
    let query = normalize_query(&options.search_query);

    items
        .iter()
        .filter(|item| options.status_filter.accepts(item.status()))
        .filter(|item| {
            query.is_empty()
                || item
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{applicant, job};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_with_empty_query_is_identity() {
        let items = vec![
            applicant(1, "Ann Lee", "pending"),
            applicant(2, "Bo Chen", "rejected"),
        ];
        let filtered = filter_entities(&items, &FilterOptions::default());
        assert_eq!(filtered, items);
    }

    #[test]
    fn test_job_status_filter() {
        let jobs = vec![job(1, "Engineer", "draft"), job(2, "Designer", "published")];
        let options = FilterOptions::new(StatusFilter::status("published"), "");
        let filtered = filter_entities(&jobs, &options);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Designer");
    }

    #[test]
    fn test_status_filter_ignores_case() {
        let items = vec![
            applicant(1, "Ann Lee", "Pending"),
            applicant(2, "Bo Chen", "reviewed"),
        ];
        let options = FilterOptions::new(StatusFilter::status("PENDING"), "");
        let filtered = filter_entities(&items, &options);
        assert_eq!(filtered.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_search_matches_any_field() {
        let mut by_email = applicant(1, "Ann Lee", "pending");
        by_email.email = "ann@acme.io".to_string();
        let mut by_job = applicant(2, "Bo Chen", "pending");
        by_job.job_title = "Product Designer".to_string();
        let other = applicant(3, "Cy Dube", "pending");
        let items = vec![by_email, by_job, other];

        let acme = filter_entities(&items, &FilterOptions::new(StatusFilter::All, "ACME"));
        assert_eq!(acme.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);

        let design = filter_entities(&items, &FilterOptions::new(StatusFilter::All, "design"));
        assert_eq!(design.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_surrounding_spaces_are_part_of_the_query() {
        let items = vec![applicant(1, "Annabel", "pending"), applicant(2, "Ann Lee", "pending")];

        let hits = filter_entities(&items, &FilterOptions::new(StatusFilter::All, "ann "));
        assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);

        let blank = filter_entities(&items, &FilterOptions::new(StatusFilter::All, "   "));
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn test_status_and_search_must_both_pass() {
        let items = vec![
            applicant(1, "Ann Lee", "pending"),
            applicant(2, "Ann Moyo", "rejected"),
        ];
        let options = FilterOptions::new(StatusFilter::status("rejected"), "ann");
        let filtered = filter_entities(&items, &options);
        assert_eq!(filtered.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);

        let none = FilterOptions::new(StatusFilter::status("accepted"), "ann");
        assert!(filter_entities(&items, &none).is_empty());
    }

    #[test]
    fn test_job_search_fields() {
        let mut remote = job(1, "Engineer", "published");
        remote.location = Some("Remote".to_string());
        let mut contract = job(2, "Designer", "published");
        contract.job_type = Some("Contract".to_string());
        contract.location = None;
        let jobs = vec![remote, contract];

        let hits = filter_entities(&jobs, &FilterOptions::new(StatusFilter::All, "remote"));
        assert_eq!(hits.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);
        let hits = filter_entities(&jobs, &FilterOptions::new(StatusFilter::All, "contract"));
        assert_eq!(hits.iter().map(|j| j.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_source_is_untouched() {
        let items = vec![applicant(1, "Ann Lee", "pending")];
        let before = items.clone();
        let _ = filter_entities(&items, &FilterOptions::new(StatusFilter::status("hired"), "x"));
        assert_eq!(items, before);
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "draft".parse::<StatusFilter>().unwrap(),
            StatusFilter::status("draft")
        );
        assert!(FilterOptions::new(StatusFilter::All, "  ").is_passthrough());
    }
}
