// src/core/mod.rs
//! Services around the pure pipeline: configuration, HTTP access, local cache.

pub mod cache;
pub mod config_manager;
pub mod database;
pub mod employer_api;
pub mod fs_ops;
pub mod job_seeker_api;
pub mod service_client;

pub use cache::{CacheStore, JobCache, JOBS_CACHE_KEY};
pub use config_manager::ConfigManager;
pub use database::Database;
pub use employer_api::EmployerApi;
pub use fs_ops::FsOps;
pub use job_seeker_api::JobSeekerApi;
pub use service_client::ServiceClient;
