// src/pipeline/stage.rs
//! Backend application status <-> Kanban pipeline stage.
//!
//! Several statuses collapse onto one stage on read, but each stage writes back
//! exactly one canonical status. Reading `interview` and writing the stage back
//! therefore yields `shortlisted`: only the stage survives a round trip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statuses the backend is known to emit.
pub const KNOWN_STATUSES: [&str; 8] = [
    "pending",
    "reviewed",
    "shortlisted",
    "interview",
    "offered",
    "accepted",
    "rejected",
    "withdrawn",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    New,
    Reviewing,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// Column order on the pipeline board.
    pub const ALL: [Stage; 6] = [
        Stage::New,
        Stage::Reviewing,
        Stage::Interview,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Reviewing => "reviewing",
            Stage::Interview => "interview",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    /// Column heading.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Reviewing => "Reviewing",
            Stage::Interview => "Interview",
            Stage::Offer => "Offer",
            Stage::Hired => "Hired",
            Stage::Rejected => "Rejected",
        }
    }

    pub fn from_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "pending" => Stage::New,
            "reviewed" => Stage::Reviewing,
            "shortlisted" | "interview" => Stage::Interview,
            "offered" => Stage::Offer,
            "accepted" => Stage::Hired,
            "rejected" | "withdrawn" => Stage::Rejected,
            _ => Stage::New,
        }
    }

    pub fn to_status(&self) -> &'static str {
        match self {
            Stage::New => "pending",
            Stage::Reviewing => "reviewed",
            Stage::Interview => "shortlisted",
            Stage::Offer => "offered",
            Stage::Hired => "accepted",
            Stage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown stage '{}'. Use one of: new, reviewing, interview, offer, hired, rejected",
                    s
                )
            })
    }
}

/// True for statuses the backend is known to emit, in any case.
pub fn is_known_status(status: &str) -> bool {
    let status = status.to_lowercase();
    KNOWN_STATUSES.contains(&status.as_str())
}

/// Map a backend status to its pipeline stage. Unknown statuses land in `new`.
pub fn map_status_to_stage(status: &str) -> Stage {
    Stage::from_status(status)
}

/// Canonical backend status written when an applicant is moved to `stage`.
pub fn map_stage_to_status(stage: Stage) -> &'static str {
    stage.to_status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_map_to_expected_stages() {
        let expected = [
            ("pending", Stage::New),
            ("reviewed", Stage::Reviewing),
            ("shortlisted", Stage::Interview),
            ("interview", Stage::Interview),
            ("offered", Stage::Offer),
            ("accepted", Stage::Hired),
            ("rejected", Stage::Rejected),
            ("withdrawn", Stage::Rejected),
        ];
        for (status, stage) in expected {
            assert_eq!(map_status_to_stage(status), stage, "status {}", status);
        }
        assert_eq!(KNOWN_STATUSES.len(), expected.len());
    }

    #[test]
    fn test_unknown_and_mixed_case_statuses() {
        assert_eq!(map_status_to_stage("on_hold"), Stage::New);
        assert_eq!(map_status_to_stage(""), Stage::New);
        assert_eq!(map_status_to_stage("Shortlisted"), Stage::Interview);
        assert_eq!(map_status_to_stage("ACCEPTED"), Stage::Hired);
    }

    #[test]
    fn test_is_known_status() {
        assert!(KNOWN_STATUSES.iter().all(|status| is_known_status(status)));
        assert!(is_known_status("Shortlisted"));
        assert!(!is_known_status("on_hold"));
        assert!(!is_known_status(""));
    }

    #[test]
    fn test_stage_round_trip_holds() {
        for stage in Stage::ALL {
            assert_eq!(map_status_to_stage(map_stage_to_status(stage)), stage);
        }
    }

    #[test]
    fn test_status_round_trip_is_lossy() {
        assert_eq!(
            map_stage_to_status(map_status_to_stage("interview")),
            "shortlisted"
        );
        assert_eq!(
            map_stage_to_status(map_status_to_stage("withdrawn")),
            "rejected"
        );
        assert_eq!(map_stage_to_status(map_status_to_stage("pending")), "pending");
    }

    #[test]
    fn test_parse_stage() {
        assert_eq!("Offer".parse::<Stage>(), Ok(Stage::Offer));
        assert_eq!(" hired ".parse::<Stage>(), Ok(Stage::Hired));
        assert!("shortlisted".parse::<Stage>().is_err());
    }
}
