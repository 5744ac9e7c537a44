// src/types/job.rs
//! Job postings and the create/update form payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::pipeline::Listable;
use crate::utils::{null_as_empty, number_or_string, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Published,
    Draft,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Published => "published",
            JobStatus::Draft => "draft",
            JobStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "published" => Ok(JobStatus::Published),
            "draft" => Ok(JobStatus::Draft),
            "closed" => Ok(JobStatus::Closed),
            other => Err(format!(
                "Unknown job status '{}'. Use published, draft or closed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
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
    pub views_count: i64,
    #[serde(default)]
    pub applications_count: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Job {
    pub fn job_status(&self) -> Option<JobStatus> {
        self.status.parse().ok()
    }
}

impl Listable for Job {
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
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.location.as_deref());
        fields.extend(self.job_type.as_deref());
        fields
    }
}

/// Body of `POST /employer/jobs` and `PUT /employer/jobs/:id`.
///
/// Every field is optional so the same type serves partial updates; absent
/// fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl JobDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Checks run before a new posting is submitted.
    pub fn validate_new(&self) -> Result<(), ApiError> {
        if is_blank(&self.title) {
            return Err(ApiError::validation("Job title is required"));
        }
        if is_blank(&self.description) {
            return Err(ApiError::validation("Job description is required"));
        }
        self.validate_common()
    }

    /// Checks run before an edit is submitted; only provided fields are checked.
    pub fn validate_update(&self) -> Result<(), ApiError> {
        if *self == JobDraft::default() {
            return Err(ApiError::validation("Nothing to update"));
        }
        if self.title.is_some() && is_blank(&self.title) {
            return Err(ApiError::validation("Job title cannot be empty"));
        }
        if self.description.is_some() && is_blank(&self.description) {
            return Err(ApiError::validation("Job description cannot be empty"));
        }
        self.validate_common()
    }

    fn validate_common(&self) -> Result<(), ApiError> {
        for salary in [self.salary_min, self.salary_max].into_iter().flatten() {
            if !salary.is_finite() || salary < 0.0 {
                return Err(ApiError::validation("Salary must be a positive number"));
            }
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(ApiError::validation(
                    "Minimum salary cannot exceed maximum salary",
                ));
            }
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
