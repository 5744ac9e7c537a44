// src/types/mod.rs
//! Backend entities and wire envelopes.

pub mod applicant;
pub mod application;
pub mod credits;
pub mod job;
pub mod listing;
pub mod response;

pub use applicant::Applicant;
pub use application::Application;
pub use credits::{CreditTransaction, CreditsBalance, UsageCategory, UsageSlice};
pub use job::{Job, JobDraft, JobStatus};
pub use listing::JobListing;
pub use response::EmployerProfile;
