use serde::{Deserialize, Serialize};

use super::{Applicant, Application, CreditTransaction, Job};

// ===== Employer Responses =====

#[derive(Debug, Deserialize)]
pub struct ApplicantsResponse {
    #[serde(default)]
    pub applicants: Vec<Applicant>,
}

#[derive(Debug, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
pub struct JobMutationResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<CreditTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployerProfile {
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub website: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub logo: Option<String>,
}

// ===== Job Seeker Responses =====

#[derive(Debug, Deserialize)]
pub struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyResponse {
    pub message: String,
    /// Raw inserted row; its shape differs from [`Application`].
    #[serde(default)]
    pub application: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobsResponse {
    #[serde(default)]
    pub saved_job_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobRequest<'a> {
    pub job_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    pub message: String,
    pub application_id: i64,
}

// ===== Shared =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest<'a> {
    pub status: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest<'a> {
    pub job_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<&'a str>,
}
