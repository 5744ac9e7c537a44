// src/export.rs
//! CSV rendering of the visible rows of a collection.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::core::FsOps;
use crate::types::{Applicant, Job, JobListing};

#[derive(Serialize)]
struct ApplicantRow<'a> {
    id: i64,
    name: &'a str,
    email: &'a str,
    role: &'a str,
    job_title: &'a str,
    status: &'a str,
    stage: &'a str,
    match_score: Option<f64>,
    applied_at: &'a str,
}

#[derive(Serialize)]
struct JobRow<'a> {
    id: i64,
    title: &'a str,
    status: &'a str,
    location: &'a str,
    job_type: &'a str,
    views: i64,
    applications: i64,
    created_at: &'a str,
}

#[derive(Serialize)]
struct ListingRow<'a> {
    id: &'a str,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    job_type: &'a str,
    salary: String,
    created_at: &'a str,
}

fn to_csv<R: Serialize>(rows: impl IntoIterator<Item = R>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

pub fn applicants_csv(applicants: &[Applicant]) -> Result<String> {
    to_csv(applicants.iter().map(|a| ApplicantRow {
        id: a.id,
        name: &a.name,
        email: &a.email,
        role: &a.role,
        job_title: &a.job_title,
        status: &a.status,
        stage: a.stage().as_str(),
        match_score: a.match_score,
        applied_at: &a.applied_at,
    }))
}

pub fn jobs_csv(jobs: &[Job]) -> Result<String> {
    to_csv(jobs.iter().map(|j| JobRow {
        id: j.id,
        title: &j.title,
        status: &j.status,
        location: j.location.as_deref().unwrap_or(""),
        job_type: j.job_type.as_deref().unwrap_or(""),
        views: j.views_count,
        applications: j.applications_count,
        created_at: j.created_at.as_deref().unwrap_or(""),
    }))
}

pub fn listings_csv(jobs: &[JobListing]) -> Result<String> {
    to_csv(jobs.iter().map(|j| ListingRow {
        id: &j.id,
        title: &j.title,
        company: &j.company,
        location: j.location.as_deref().unwrap_or(""),
        job_type: j.job_type.as_deref().unwrap_or(""),
        salary: j.salary_range().unwrap_or_default(),
        created_at: j.created_at.as_deref().unwrap_or(""),
    }))
}

pub async fn write_csv(path: &Path, contents: &str) -> Result<()> {
    FsOps::write_file_safe(path, contents.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{applicant, job, listing, scored};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_applicants_csv() {
        let mut bo = applicant(2, "Bo, Chen", "shortlisted");
        bo.applied_at = String::new();
        let csv = applicants_csv(&[scored(1, "Ann Lee", 87.5), bo]).unwrap();

        assert_eq!(
            csv,
            "id,name,email,role,job_title,status,stage,match_score,applied_at\n\
             1,Ann Lee,ann.lee@example.com,Engineer,Backend Engineer,pending,new,87.5,2024-03-01T10:00:00Z\n\
             2,\"Bo, Chen\",\"bo,.chen@example.com\",Engineer,Backend Engineer,shortlisted,interview,,\n"
        );
    }

    #[test]
    fn test_jobs_csv() {
        let csv = jobs_csv(&[job(7, "Designer", "draft")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,title,status,location,job_type,views,applications,created_at")
        );
        assert_eq!(
            lines.next(),
            Some("7,Designer,draft,Cape Town,full-time,0,0,2024-02-01T09:00:00Z")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_listings_csv() {
        let mut paid = listing("12", "Chef", "Bistro");
        paid.salary_min = Some(20000.0);
        paid.salary_currency = Some("R".to_string());
        let csv = listings_csv(&[paid]).unwrap();
        assert_eq!(
            csv,
            "id,title,company,location,job_type,salary,created_at\n\
             12,Chef,Bistro,Cape Town,full-time,From R20000,2024-04-01T09:00:00Z\n"
        );
    }

    #[test]
    fn test_empty_list_has_no_header() {
        assert_eq!(applicants_csv(&[]).unwrap(), "");
    }

    #[tokio::test]
    async fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("applicants.csv");
        write_csv(&path, "id\n1\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "id\n1\n");
    }
}
