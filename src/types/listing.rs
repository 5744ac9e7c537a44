// src/types/listing.rs
//! Published jobs as job seekers see them in the public feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::Listable;
use crate::utils::{id_as_string, null_as_empty, number_or_string, parse_timestamp};

/// One entry of `GET /jobs`: a published job joined with its employer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub salary_min: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl JobListing {
    /// "R20000 - R30000", "From R20000", or `None` when no range is set.
    pub fn salary_range(&self) -> Option<String> {
        let currency = self.salary_currency.as_deref().unwrap_or("");
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(format!("{currency}{min:.0} - {currency}{max:.0}")),
            (Some(min), None) => Some(format!("From {currency}{min:.0}")),
            (None, Some(max)) => Some(format!("Up to {currency}{max:.0}")),
            (None, None) => None,
        }
    }
}

impl Listable for JobListing {
    fn status(&self) -> &str {
        &self.status
    }

    fn sort_name(&self) -> &str {
        &self.title
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.company.as_str()];
        fields.extend(self.location.as_deref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::listing;
    use crate::pipeline::{filter_entities, FilterOptions, StatusFilter};

    #[test]
    fn test_decode_feed_entry() {
        let raw = serde_json::json!({
            "id": "42",
            "title": "Data Analyst",
            "company": "Acme",
            "location": null,
            "jobType": "full-time",
            "salaryMin": "25000.00",
            "salaryMax": 40000,
            "salaryCurrency": "R",
            "status": "published",
            "viewsCount": 3,
            "createdAt": "2024-05-01T08:00:00.000Z"
        });
        let job: JobListing = serde_json::from_value(raw).unwrap();
        assert_eq!(job.id, "42");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, None);
        assert_eq!(job.salary_range().as_deref(), Some("R25000 - R40000"));
        assert!(job.timestamp().is_some());

        let numeric: JobListing =
            serde_json::from_value(serde_json::json!({ "id": 7, "title": "Chef" })).unwrap();
        assert_eq!(numeric.id, "7");
        assert_eq!(numeric.salary_range(), None);
    }

    #[test]
    fn test_search_covers_title_company_and_location() {
        let mut by_city = listing("1", "Engineer", "Initech");
        by_city.location = Some("Durban".to_string());
        let feed = vec![by_city, listing("2", "Designer", "Acme"), listing("3", "Chef", "Bistro")];

        let hits = |q: &str| {
            filter_entities(&feed, &FilterOptions::new(StatusFilter::All, q))
                .into_iter()
                .map(|j| j.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(hits("durban"), vec!["1"]);
        assert_eq!(hits("ACME"), vec!["2"]);
        assert_eq!(hits("chef"), vec!["3"]);
        assert!(hits("full-time").is_empty());
    }

    #[test]
    fn test_cache_round_trip_keeps_string_ids() {
        let original = listing("9", "Engineer", "Initech");
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: JobListing = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, original);
    }
}
