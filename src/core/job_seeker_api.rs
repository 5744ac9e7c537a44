// src/core/job_seeker_api.rs
use tracing::info;

use super::ServiceClient;
use crate::error::ApiError;
use crate::types::response::{
    ApplicationsResponse, ApplyRequest, ApplyResponse, MessageResponse, SaveJobRequest,
    SavedJobsResponse, WithdrawResponse,
};
use crate::types::{Application, JobListing};

const FEED_ENDPOINT: &str = "/jobs";
const APPLICATIONS_ENDPOINT: &str = "/job-seeker/applications";
const SAVED_JOBS_ENDPOINT: &str = "/job-seeker/saved-jobs";

#[derive(Debug, Clone)]
pub struct JobSeekerApi {
    client: ServiceClient,
}

impl JobSeekerApi {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Every published job, newest first. Needs no sign-in.
    pub async fn jobs(&self) -> Result<Vec<JobListing>, ApiError> {
        let jobs: Vec<JobListing> = self.client.get_public(FEED_ENDPOINT).await?;
        info!("Fetched {} published jobs", jobs.len());
        Ok(jobs)
    }

    pub async fn saved_job_ids(&self) -> Result<Vec<String>, ApiError> {
        let response: SavedJobsResponse = self.client.get(SAVED_JOBS_ENDPOINT).await?;
        Ok(response.saved_job_ids)
    }

    pub async fn save_job(&self, job_id: &str) -> Result<MessageResponse, ApiError> {
        let job_id = require_job_id(job_id)?;
        self.client
            .post_json(SAVED_JOBS_ENDPOINT, &SaveJobRequest { job_id })
            .await
    }

    pub async fn unsave_job(&self, job_id: &str) -> Result<MessageResponse, ApiError> {
        let job_id = require_job_id(job_id)?;
        let endpoint = format!("{}/{}", SAVED_JOBS_ENDPOINT, job_id);
        self.client.delete(&endpoint).await
    }

    pub async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        let response: ApplicationsResponse = self.client.get(APPLICATIONS_ENDPOINT).await?;
        info!("Fetched {} applications", response.applications.len());
        Ok(response.applications)
    }

    pub async fn apply(
        &self,
        job_id: i64,
        cover_letter: Option<&str>,
    ) -> Result<ApplyResponse, ApiError> {
        if job_id <= 0 {
            return Err(ApiError::validation("Job ID is required"));
        }
        let request = ApplyRequest {
            job_id,
            cover_letter: cover_letter.filter(|c| !c.trim().is_empty()),
        };
        self.client.post_json(APPLICATIONS_ENDPOINT, &request).await
    }

    pub async fn withdraw(&self, application_id: i64) -> Result<WithdrawResponse, ApiError> {
        let endpoint = format!("{}/{}", APPLICATIONS_ENDPOINT, application_id);
        self.client.delete(&endpoint).await
    }
}

fn require_job_id(job_id: &str) -> Result<&str, ApiError> {
    match job_id.trim() {
        "" => Err(ApiError::validation("Job ID is required")),
        id => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_apply_requires_job_id() {
        let client = ServiceClient::new("http://localhost:3000/api", 5)
            .unwrap()
            .with_token(Some("t".to_string()));
        let err = JobSeekerApi::new(client).apply(0, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Job ID is required");
    }

    #[test]
    fn test_apply_request_body() {
        let body = ApplyRequest {
            job_id: 5,
            cover_letter: Some("Hello"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "jobId": 5, "coverLetter": "Hello" })
        );
    }

    #[tokio::test]
    async fn test_save_requires_job_id() {
        let client = ServiceClient::new("http://localhost:3000/api", 5)
            .unwrap()
            .with_token(Some("t".to_string()));
        let api = JobSeekerApi::new(client);
        assert_eq!(api.save_job("  ").await.unwrap_err().to_string(), "Job ID is required");
        assert!(matches!(api.unsave_job("").await, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_save_request_body() {
        assert_eq!(
            serde_json::to_value(SaveJobRequest { job_id: "12" }).unwrap(),
            serde_json::json!({ "jobId": "12" })
        );
    }

    #[test]
    fn test_saved_jobs_response() {
        let response: SavedJobsResponse =
            serde_json::from_str(r#"{"savedJobIds":["3","8"]}"#).unwrap();
        assert_eq!(response.saved_job_ids, vec!["3", "8"]);
    }
}
