// src/types/applicant.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::{Listable, Stage};
use crate::utils::{null_as_empty, number_or_string, parse_timestamp};

/// An application as seen from the employer side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_title: String,
    pub job_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub applied_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub match_score: Option<f64>,
}

impl Applicant {
    pub fn stage(&self) -> Stage {
        Stage::from_status(&self.status)
    }

    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.applied_at)
    }
}

impl Listable for Applicant {
    fn status(&self) -> &str {
        &self.status
    }

    fn sort_name(&self) -> &str {
        &self.name
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.applied_at()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.role.as_str(),
            self.job_title.as_str(),
        ]
    }

    fn match_score(&self) -> Option<f64> {
        self.match_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_recent_applicant() {
        let raw = r#"{
            "id": 12,
            "name": "Thandi Nkosi",
            "email": "thandi@example.com",
            "role": null,
            "jobTitle": "Frontend Developer",
            "jobId": 4,
            "appliedAt": "2024-05-02T08:30:00.000Z",
            "status": "shortlisted",
            "matchScore": null
        }"#;
        let applicant: Applicant = serde_json::from_str(raw).unwrap();
        assert_eq!(applicant.role, "");
        assert_eq!(applicant.match_score, None);
        assert_eq!(applicant.score_or_zero(), 0.0);
        assert_eq!(applicant.stage(), Stage::Interview);
        assert!(applicant.applied_at().is_some());
    }

    #[test]
    fn test_score_as_string() {
        let raw = r#"{"id": 1, "name": "A", "jobId": 2, "appliedAt": "", "status": "pending", "matchScore": "78.00"}"#;
        let applicant: Applicant = serde_json::from_str(raw).unwrap();
        assert_eq!(applicant.match_score, Some(78.0));
        assert_eq!(applicant.timestamp(), None);
    }
}
