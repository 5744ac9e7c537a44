// src/view/commands.rs
//! Optimistic status changes on the applicant board.
//!
//! A move is applied to the local list immediately, then written to the
//! backend. A rejected write puts the previous status back, provided nothing
//! else has changed that applicant in the meantime.

use tracing::{error, info, warn};
use uuid::Uuid;

use super::CollectionView;
use crate::error::ApiError;
use crate::pipeline::Stage;
use crate::types::response::StatusUpdateResponse;
use crate::types::Applicant;

/// Anything that can persist an application status.
#[allow(async_fn_in_trait)]
pub trait StatusWriter {
    async fn write_status(
        &self,
        application_id: i64,
        status: &str,
    ) -> Result<StatusUpdateResponse, ApiError>;
}

/// A status change shown locally but not yet confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatusChange {
    pub id: Uuid,
    pub application_id: i64,
    pub previous_status: String,
    pub new_status: String,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicantBoard {
    view: CollectionView<Applicant>,
    pending: Vec<PendingStatusChange>,
}

impl ApplicantBoard {
    pub fn new(view: CollectionView<Applicant>) -> Self {
        Self {
            view,
            pending: Vec::new(),
        }
    }

    pub fn view(&self) -> &CollectionView<Applicant> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CollectionView<Applicant> {
        &mut self.view
    }

    pub fn into_view(self) -> CollectionView<Applicant> {
        self.view
    }

    pub fn pending(&self) -> &[PendingStatusChange] {
        &self.pending
    }

    pub fn is_pending(&self, application_id: i64) -> bool {
        self.pending
            .iter()
            .any(|change| change.application_id == application_id)
    }

    /// Apply the move locally and record it as pending.
    pub fn begin_move(
        &mut self,
        application_id: i64,
        stage: Stage,
    ) -> Result<PendingStatusChange, ApiError> {
        if self.is_pending(application_id) {
            return Err(ApiError::validation(format!(
                "Application {} already has a status change in flight",
                application_id
            )));
        }

        let previous_status = self
            .view
            .items()
            .iter()
            .find(|a| a.id == application_id)
            .map(|a| a.status.clone())
            .ok_or_else(|| {
                ApiError::validation(format!("Application {} is not on the board", application_id))
            })?;

        let change = PendingStatusChange {
            id: Uuid::new_v4(),
            application_id,
            previous_status,
            new_status: stage.to_status().to_string(),
        };

        let new_status = change.new_status.clone();
        self.view
            .update_item(|a| a.id == application_id, |a| a.status = new_status);
        self.pending.push(change.clone());

        info!(
            "Moved application {} from '{}' to '{}' (pending {})",
            application_id, change.previous_status, change.new_status, change.id
        );
        Ok(change)
    }

    /// The backend accepted the change. Its reported status wins over ours.
    pub fn commit(&mut self, change: &PendingStatusChange, confirmed_status: &str) {
        self.pending.retain(|p| p.id != change.id);
        if !confirmed_status.is_empty() && confirmed_status != change.new_status {
            let confirmed = confirmed_status.to_string();
            self.view.update_item(
                |a| a.id == change.application_id && a.status == change.new_status,
                |a| a.status = confirmed,
            );
        }
    }

    /// The backend refused the change. Returns whether the previous status
    /// was restored.
    pub fn revert(&mut self, change: &PendingStatusChange) -> bool {
        self.pending.retain(|p| p.id != change.id);
        let previous = change.previous_status.clone();
        let restored = self.view.update_item(
            |a| a.id == change.application_id && a.status == change.new_status,
            |a| a.status = previous,
        );
        if !restored {
            warn!(
                "Application {} changed again before {} failed; leaving it as is",
                change.application_id, change.id
            );
        }
        restored
    }

    /// Move an applicant to `stage`: apply locally, write, then commit or revert.
    pub async fn move_to_stage<W: StatusWriter>(
        &mut self,
        writer: &W,
        application_id: i64,
        stage: Stage,
    ) -> Result<StatusUpdateResponse, ApiError> {
        let change = self.begin_move(application_id, stage)?;

        match writer
            .write_status(application_id, &change.new_status)
            .await
        {
            Ok(response) => {
                self.commit(&change, &response.status);
                Ok(response)
            }
            Err(e) => {
                error!(
                    "Status update for application {} failed: {}",
                    application_id, e
                );
                self.revert(&change);
                Err(e)
            }
        }
    }
}
