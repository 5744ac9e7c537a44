// src/core/employer_api.rs
//! Employer endpoints: applicants, job postings, credits, profile.

use tracing::{info, warn};

use super::ServiceClient;
use crate::error::ApiError;
use crate::pipeline::stage::is_known_status;
use crate::pipeline::Stage;
use crate::types::response::{
    ApplicantsResponse, JobMutationResponse, JobsResponse, MessageResponse,
    StatusUpdateRequest, StatusUpdateResponse, TransactionsResponse,
};
use crate::types::{
    Applicant, CreditTransaction, CreditsBalance, EmployerProfile, Job, JobDraft,
};
use crate::view::StatusWriter;

const RECENT_APPLICANTS_ENDPOINT: &str = "/employer/dashboard/recent-applicants";
const JOBS_ENDPOINT: &str = "/employer/jobs";
const APPLICATIONS_ENDPOINT: &str = "/employer/applications";
const PROFILE_ENDPOINT: &str = "/employer/profile";
const CREDITS_BALANCE_ENDPOINT: &str = "/employer/credits/balance";
const CREDITS_TRANSACTIONS_ENDPOINT: &str = "/employer/credits/transactions";

/// The pipeline board asks for this many applicants.
pub const PIPELINE_FETCH_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct EmployerApi {
    client: ServiceClient,
}

impl EmployerApi {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub async fn recent_applicants(&self, limit: u32) -> Result<Vec<Applicant>, ApiError> {
        let endpoint = format!("{}?limit={}", RECENT_APPLICANTS_ENDPOINT, limit);
        let response: ApplicantsResponse = self.client.get(&endpoint).await?;
        info!("Fetched {} applicants", response.applicants.len());
        for applicant in unknown_status(&response.applicants) {
            warn!(
                "Applicant {} has unknown status '{}'; shown under New",
                applicant.id, applicant.status
            );
        }
        Ok(response.applicants)
    }

    pub async fn update_application_status(
        &self,
        application_id: i64,
        status: &str,
    ) -> Result<StatusUpdateResponse, ApiError> {
        if status.trim().is_empty() {
            return Err(ApiError::validation("Status cannot be empty"));
        }
        let endpoint = format!("{}/{}/status", APPLICATIONS_ENDPOINT, application_id);
        self.client
            .patch_json(&endpoint, &StatusUpdateRequest { status })
            .await
    }

    /// Move an applicant to a pipeline stage, writing the stage's canonical status.
    pub async fn move_to_stage(
        &self,
        application_id: i64,
        stage: Stage,
    ) -> Result<StatusUpdateResponse, ApiError> {
        self.update_application_status(application_id, stage.to_status())
            .await
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response: JobsResponse = self.client.get(JOBS_ENDPOINT).await?;
        info!("Fetched {} jobs", response.jobs.len());
        Ok(response.jobs)
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<JobMutationResponse, ApiError> {
        draft.validate_new()?;
        self.client.post_json(JOBS_ENDPOINT, draft).await
    }

    pub async fn update_job(
        &self,
        job_id: i64,
        draft: &JobDraft,
    ) -> Result<JobMutationResponse, ApiError> {
        draft.validate_update()?;
        let endpoint = format!("{}/{}", JOBS_ENDPOINT, job_id);
        self.client.put_json(&endpoint, draft).await
    }

    pub async fn delete_job(&self, job_id: i64) -> Result<MessageResponse, ApiError> {
        let endpoint = format!("{}/{}", JOBS_ENDPOINT, job_id);
        self.client.delete(&endpoint).await
    }

    pub async fn profile(&self) -> Result<EmployerProfile, ApiError> {
        self.client.get(PROFILE_ENDPOINT).await
    }

    pub async fn credits_balance(&self) -> Result<CreditsBalance, ApiError> {
        self.client.get(CREDITS_BALANCE_ENDPOINT).await
    }

    pub async fn credit_transactions(
        &self,
        limit: u32,
    ) -> Result<Vec<CreditTransaction>, ApiError> {
        let endpoint = format!("{}?limit={}", CREDITS_TRANSACTIONS_ENDPOINT, limit);
        let response: TransactionsResponse = self.client.get(&endpoint).await?;
        Ok(response.transactions)
    }
}

fn unknown_status(applicants: &[Applicant]) -> impl Iterator<Item = &Applicant> {
    applicants.iter().filter(|a| !is_known_status(&a.status))
}

impl StatusWriter for EmployerApi {
    async fn write_status(
        &self,
        application_id: i64,
        status: &str,
    ) -> Result<StatusUpdateResponse, ApiError> {
        self.update_application_status(application_id, status)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::applicant;

    fn api() -> EmployerApi {
        let client = ServiceClient::new("http://localhost:3000/api", 5)
            .unwrap()
            .with_token(Some("test-token".to_string()));
        EmployerApi::new(client)
    }

    #[tokio::test]
    async fn test_invalid_job_never_leaves_the_client() {
        let err = api()
            .create_job(&JobDraft::new("", "Description"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_statuses_are_flagged() {
        let applicants = vec![
            applicant(1, "Ann Lee", "Pending"),
            applicant(2, "Bo Chen", "on_hold"),
            applicant(3, "Cy Dube", "withdrawn"),
        ];
        let flagged: Vec<i64> = unknown_status(&applicants).map(|a| a.id).collect();
        assert_eq!(flagged, vec![2]);
    }

    #[tokio::test]
    async fn test_empty_status_is_rejected_locally() {
        let err = api().update_application_status(4, " ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
