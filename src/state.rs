// src/state.rs
//! Application-wide state: who is signed in, the public job feed, the
//! employer's own postings and profile. Owned by the caller and passed by reference; read through the
//! selector methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::config_manager::ServiceConfig;
use crate::error::ApiError;
use crate::types::{EmployerProfile, Job, JobListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    JobSeeker,
    Employer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::JobSeeker => f.write_str("job_seeker"),
            UserRole::Employer => f.write_str("employer"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "job_seeker" | "jobseeker" | "seeker" => Ok(UserRole::JobSeeker),
            "employer" => Ok(UserRole::Employer),
            other => Err(format!("Unknown role '{}'. Use employer or job_seeker", other)),
        }
    }
}

/// Where the current job feed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Cache,
    Network,
}

#[derive(Debug, Clone, Default)]
struct AuthState {
    token: Option<String>,
    role: Option<UserRole>,
}

#[derive(Debug, Clone, Default)]
struct FeedState {
    items: Vec<JobListing>,
    saved_ids: Vec<String>,
    source: Option<FeedSource>,
    synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    auth: AuthState,
    feed: FeedState,
    postings: Vec<Job>,
    profile: Option<EmployerProfile>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(service: &ServiceConfig) -> Self {
        let mut state = Self::new();
        if let Some(token) = service.token.clone() {
            state.sign_in(token, service.role);
        }
        state
    }

    // ===== Selectors =====

    pub fn token(&self) -> Option<&str> {
        self.auth.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.token.is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.auth.role
    }

    /// Fail early when the signed-in role is known and is not `role`.
    pub fn require_role(&self, role: UserRole) -> Result<(), ApiError> {
        if !self.is_authenticated() {
            return Err(ApiError::validation("Not signed in"));
        }
        match self.auth.role {
            Some(actual) if actual != role => Err(ApiError::validation(format!(
                "This action needs a {} account, signed in as {}",
                role, actual
            ))),
            _ => Ok(()),
        }
    }

    /// Published jobs visible to job seekers.
    pub fn feed(&self) -> &[JobListing] {
        &self.feed.items
    }

    pub fn feed_source(&self) -> Option<FeedSource> {
        self.feed.source
    }

    pub fn feed_synced_at(&self) -> Option<DateTime<Utc>> {
        self.feed.synced_at
    }

    pub fn is_saved(&self, job_id: &str) -> bool {
        self.feed.saved_ids.iter().any(|id| id == job_id)
    }

    /// Feed entries the job seeker has saved, in feed order.
    pub fn saved_jobs(&self) -> Vec<JobListing> {
        self.feed
            .items
            .iter()
            .filter(|job| self.is_saved(&job.id))
            .cloned()
            .collect()
    }

    /// The employer's own postings.
    pub fn postings(&self) -> &[Job] {
        &self.postings
    }

    pub fn profile(&self) -> Option<&EmployerProfile> {
        self.profile.as_ref()
    }

    // ===== Updates =====

    pub fn sign_in(&mut self, token: String, role: Option<UserRole>) {
        self.auth = AuthState {
            token: Some(token).filter(|t| !t.trim().is_empty()),
            role,
        };
    }

    /// Show a cached feed, unless a network feed has already arrived.
    pub fn hydrate_feed_from_cache(
        &mut self,
        jobs: Vec<JobListing>,
        cached_at: DateTime<Utc>,
    ) -> bool {
        if self.feed.source == Some(FeedSource::Network) {
            return false;
        }
        self.feed.items = jobs;
        self.feed.source = Some(FeedSource::Cache);
        self.feed.synced_at = Some(cached_at);
        true
    }

    pub fn set_feed(&mut self, jobs: Vec<JobListing>) {
        self.feed.items = jobs;
        self.feed.source = Some(FeedSource::Network);
        self.feed.synced_at = Some(Utc::now());
    }

    pub fn set_saved_ids(&mut self, ids: Vec<String>) {
        self.feed.saved_ids = ids;
    }

    pub fn set_saved(&mut self, job_id: &str, saved: bool) {
        self.feed.saved_ids.retain(|id| id != job_id);
        if saved {
            self.feed.saved_ids.push(job_id.to_string());
        }
    }

    pub fn set_postings(&mut self, jobs: Vec<Job>) {
        self.postings = jobs;
    }

    pub fn upsert_posting(&mut self, job: Job) {
        match self.postings.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job,
            None => self.postings.insert(0, job),
        }
    }

    pub fn remove_posting(&mut self, job_id: i64) -> bool {
        let before = self.postings.len();
        self.postings.retain(|j| j.id != job_id);
        self.postings.len() != before
    }

    pub fn set_profile(&mut self, profile: EmployerProfile) {
        self.profile = Some(profile);
    }
}
