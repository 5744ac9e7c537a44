// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::Listable;
use crate::utils::{null_as_empty, number_or_string, parse_timestamp};

/// An application as seen by the job seeker who submitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    /// Status of the posting itself (`published`, `draft`, `closed`).
    #[serde(default)]
    pub job_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applied_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Application {
    /// Applications in a final state cannot be withdrawn.
    pub fn can_withdraw(&self) -> bool {
        !matches!(
            self.status.to_lowercase().as_str(),
            "withdrawn" | "rejected" | "accepted" | "hired"
        )
    }
}

impl Listable for Application {
    fn status(&self) -> &str {
        &self.status
    }

    fn sort_name(&self) -> &str {
        &self.job_title
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.applied_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.job_title.as_str(), self.company.as_str()];
        fields.extend(self.location.as_deref());
        fields
    }

    fn match_score(&self) -> Option<f64> {
        self.match_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_and_withdraw_rules() {
        let raw = r#"{
            "id": 3,
            "jobId": 9,
            "jobTitle": "QA Engineer",
            "jobDescription": "Testing",
            "company": "Acme",
            "companyLogo": null,
            "location": null,
            "jobType": "contract",
            "jobStatus": "published",
            "status": "pending",
            "coverLetter": null,
            "matchScore": 64,
            "appliedAt": "2024-02-02T12:00:00.000Z"
        }"#;
        let mut application: Application = serde_json::from_str(raw).unwrap();
        assert_eq!(application.match_score, Some(64.0));
        assert_eq!(application.search_fields(), vec!["QA Engineer", "Acme"]);
        assert!(application.can_withdraw());

        application.status = "Withdrawn".to_string();
        assert!(!application.can_withdraw());
    }
}
