use sqlx::SqliteConnection;
use tracing::{debug, info};

use paperflow_core::domain::approval::{
    Approval, ApprovalId, ApprovalStatus, ApprovalStep, StepId, StepStatus, UserId,
};
use paperflow_core::domain::document::{Document, DocumentId, DocumentStatus};
use paperflow_core::workflow::aggregate::aggregate_targets;
use paperflow_core::workflow::transitions::{
    approval_transition_allowed, document_transition_allowed, step_transition_allowed,
};
use paperflow_db::repositories::{approval as approvals, document as documents};
use paperflow_db::DbPool;

use crate::errors::ServiceError;

/// Orchestrates the approval workflow: opening a review cycle, recording
/// individual approver decisions, and deriving approval/document status
/// from the step set. Each public operation is one transaction.
pub struct ApprovalService {
    pool: DbPool,
}

impl ApprovalService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open an approval cycle for a document: one Pending approval plus one
    /// Pending step per approver, in the given order, and the document
    /// moves to Approval status.
    ///
    /// Submitting while a cycle is already open is a no-op that hands back
    /// the open cycle, not an error and not a duplicate.
    pub async fn create_approval_flow(
        &self,
        document_id: DocumentId,
        approver_ids: &[UserId],
    ) -> Result<Option<Approval>, ServiceError> {
        if approver_ids.is_empty() {
            debug!(
                event_name = "approval.flow_denied",
                reason = "empty_approver_list",
                document_id = document_id.0,
                "refusing to open approval flow"
            );
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let Some(document) = documents::get_document(&mut tx, document_id).await? else {
            return Ok(None);
        };
        if document.is_archived {
            debug!(
                event_name = "approval.flow_denied",
                reason = "document_archived",
                document_id = document_id.0,
                "refusing to open approval flow"
            );
            return Ok(None);
        }

        if document.status == DocumentStatus::Approval {
            if let Some(existing) = approvals::get_by_document_id(&mut tx, document_id).await? {
                return Ok(Some(existing));
            }
            // document marked Approval with no cycle on record; open one
        } else if !document_transition_allowed(document.status, DocumentStatus::Approval) {
            debug!(
                event_name = "approval.flow_denied",
                reason = "illegal_transition",
                document_id = document_id.0,
                current_status = document.status.as_str(),
                "refusing to open approval flow"
            );
            return Ok(None);
        }

        let approval =
            approvals::create_approval(&mut tx, document_id, ApprovalStatus::Pending).await?;
        for approver_id in approver_ids {
            approvals::create_step(&mut tx, approval.id, *approver_id, StepStatus::Pending)
                .await?;
        }
        if document.status != DocumentStatus::Approval {
            documents::set_status(&mut tx, document_id, DocumentStatus::Approval).await?;
        }

        tx.commit().await?;
        info!(
            event_name = "approval.flow_created",
            approval_id = approval.id.0,
            document_id = document_id.0,
            steps = approver_ids.len(),
            "approval flow created"
        );
        Ok(Some(approval))
    }

    /// Record the assigned approver's acceptance of a step, then recompute
    /// the approval and document status from the full step set.
    pub async fn approve_step(
        &self,
        step_id: StepId,
        acting_user_id: UserId,
    ) -> Result<Option<ApprovalStep>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let Some(step) = self.load_actionable_step(&mut tx, step_id, acting_user_id).await?
        else {
            return Ok(None);
        };
        if !step_transition_allowed(step.status, StepStatus::Approved) {
            return Ok(None);
        }

        let step = approvals::set_step_status(&mut tx, step_id, StepStatus::Approved, None).await?;
        self.recalc_approval_status(&mut tx, step.approval_id).await?;

        tx.commit().await?;
        info!(
            event_name = "approval.step_approved",
            step_id = step.id.0,
            approval_id = step.approval_id.0,
            approver_id = acting_user_id.0,
            "approval step approved"
        );
        Ok(Some(step))
    }

    /// Reject a step and cancel the document outright.
    pub async fn reject_step(
        &self,
        step_id: StepId,
        acting_user_id: UserId,
        reason: &str,
    ) -> Result<Option<ApprovalStep>, ServiceError> {
        self.reject_step_toward(step_id, acting_user_id, reason, DocumentStatus::Canceled).await
    }

    /// Reject a step and send the document back for revision.
    pub async fn request_revision_step(
        &self,
        step_id: StepId,
        acting_user_id: UserId,
        reason: &str,
    ) -> Result<Option<ApprovalStep>, ServiceError> {
        self.reject_step_toward(step_id, acting_user_id, reason, DocumentStatus::RevisionRequired)
            .await
    }

    /// Shared rejection routine. Unlike the aggregation path, the caller
    /// picks the document outcome here: direct rejection may cancel the
    /// document outright, while aggregation only ever proposes revision.
    /// The two paths intentionally disagree; do not unify them.
    async fn reject_step_toward(
        &self,
        step_id: StepId,
        acting_user_id: UserId,
        reason: &str,
        document_target: DocumentStatus,
    ) -> Result<Option<ApprovalStep>, ServiceError> {
        if reason.trim().is_empty() {
            debug!(
                event_name = "approval.step_rejection_denied",
                reason = "empty_rejection_reason",
                step_id = step_id.0,
                "refusing step rejection"
            );
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let Some(step) = self.load_actionable_step(&mut tx, step_id, acting_user_id).await?
        else {
            return Ok(None);
        };
        if !step_transition_allowed(step.status, StepStatus::Rejected) {
            return Ok(None);
        }

        let parent = approvals::get_approval(&mut tx, step.approval_id).await?;
        let step =
            approvals::set_step_status(&mut tx, step_id, StepStatus::Rejected, Some(reason))
                .await?;

        let Some(approval) = parent else {
            tx.commit().await?;
            return Ok(Some(step));
        };
        if approval_transition_allowed(approval.status, ApprovalStatus::Rejected) {
            approvals::set_approval_status(&mut tx, approval.id, ApprovalStatus::Rejected).await?;
        }

        if let Some(document) = documents::get_document(&mut tx, approval.document_id).await? {
            if !document.is_archived
                && document.status != document_target
                && document_transition_allowed(document.status, document_target)
            {
                documents::set_status(&mut tx, document.id, document_target).await?;
            }
        }

        tx.commit().await?;
        info!(
            event_name = "approval.step_rejected",
            step_id = step.id.0,
            approval_id = approval.id.0,
            approver_id = acting_user_id.0,
            document_target = document_target.as_str(),
            "approval step rejected"
        );
        Ok(Some(step))
    }

    /// Most recent approval cycle for a document plus its steps in creation
    /// order. Read-only.
    pub async fn get_approval_with_steps(
        &self,
        document_id: DocumentId,
    ) -> Result<(Option<Approval>, Vec<ApprovalStep>), ServiceError> {
        let mut conn = self.pool.acquire().await?;

        let Some(approval) = approvals::get_by_document_id(&mut conn, document_id).await? else {
            return Ok((None, Vec::new()));
        };
        let steps = approvals::list_steps(&mut conn, approval.id).await?;
        Ok((Some(approval), steps))
    }

    /// Active documents still waiting on the approver's decision.
    pub async fn list_pending_documents(
        &self,
        approver_id: UserId,
    ) -> Result<Vec<Document>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(approvals::list_documents_for_approver(&mut conn, approver_id).await?)
    }

    /// Fetch a step and enforce the guards shared by every step action:
    /// the step must exist, the acting user must be its assigned approver,
    /// and the owning document must not be archived. Authorization failure
    /// is reported the same way as not-found on purpose; callers only see
    /// `None` either way.
    async fn load_actionable_step(
        &self,
        conn: &mut SqliteConnection,
        step_id: StepId,
        acting_user_id: UserId,
    ) -> Result<Option<ApprovalStep>, ServiceError> {
        let Some(step) = approvals::get_step(conn, step_id).await? else {
            return Ok(None);
        };
        if step.approver_id != acting_user_id {
            debug!(
                event_name = "approval.step_action_denied",
                reason = "not_assigned_approver",
                step_id = step_id.0,
                acting_user_id = acting_user_id.0,
                "step action denied"
            );
            return Ok(None);
        }

        if let Some(approval) = approvals::get_approval(conn, step.approval_id).await? {
            if let Some(document) = documents::get_document(conn, approval.document_id).await? {
                if document.is_archived {
                    debug!(
                        event_name = "approval.step_action_denied",
                        reason = "document_archived",
                        step_id = step_id.0,
                        document_id = document.id.0,
                        "step action denied"
                    );
                    return Ok(None);
                }
            }
        }

        Ok(Some(step))
    }

    /// Recompute approval and document status from the current step set.
    ///
    /// Any rejected step vetoes the cycle; a non-empty all-approved set
    /// resolves it; anything else keeps it pending. A canceled document is
    /// sticky: aggregation never resurrects it. Each target is gated
    /// independently against its own transition table.
    async fn recalc_approval_status(
        &self,
        conn: &mut SqliteConnection,
        approval_id: ApprovalId,
    ) -> Result<(), ServiceError> {
        let Some(approval) = approvals::get_approval(conn, approval_id).await? else {
            return Ok(());
        };
        let Some(document) = documents::get_document(conn, approval.document_id).await? else {
            return Ok(());
        };
        if document.status == DocumentStatus::Canceled {
            return Ok(());
        }

        let steps = approvals::list_steps(conn, approval_id).await?;
        let statuses: Vec<StepStatus> = steps.iter().map(|step| step.status).collect();
        let targets = aggregate_targets(&statuses);

        if targets.approval != approval.status
            && approval_transition_allowed(approval.status, targets.approval)
        {
            approvals::set_approval_status(conn, approval_id, targets.approval).await?;
            info!(
                event_name = "approval.status_recalculated",
                approval_id = approval_id.0,
                new_status = targets.approval.as_str(),
                "approval status recalculated"
            );
        }
        if targets.document != document.status
            && document_transition_allowed(document.status, targets.document)
        {
            documents::set_status(conn, document.id, targets.document).await?;
        }

        Ok(())
    }
}
