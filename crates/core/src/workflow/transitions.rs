//! Fixed transition tables, expressed as data (current state -> allowed
//! targets) rather than behavior on the status types. These predicates are
//! the single source of truth for legality: no caller may mutate a status
//! without consulting them first.

use crate::domain::approval::{ApprovalStatus, StepStatus};
use crate::domain::document::DocumentStatus;

/// Targets a document may move to from `current`. Approved is terminal;
/// Canceled can only be restored back to Draft.
pub fn document_allowed_targets(current: DocumentStatus) -> &'static [DocumentStatus] {
    match current {
        DocumentStatus::Draft => &[DocumentStatus::Approval],
        DocumentStatus::Approval => &[
            DocumentStatus::Approved,
            DocumentStatus::RevisionRequired,
            DocumentStatus::Canceled,
        ],
        DocumentStatus::RevisionRequired => &[DocumentStatus::Approval],
        DocumentStatus::Canceled => &[DocumentStatus::Draft],
        DocumentStatus::Approved => &[],
    }
}

pub fn document_transition_allowed(current: DocumentStatus, target: DocumentStatus) -> bool {
    document_allowed_targets(current).contains(&target)
}

/// An approval resolves exactly once: Pending -> Approved or Rejected.
pub fn approval_allowed_targets(current: ApprovalStatus) -> &'static [ApprovalStatus] {
    match current {
        ApprovalStatus::Pending => &[ApprovalStatus::Approved, ApprovalStatus::Rejected],
        ApprovalStatus::Approved | ApprovalStatus::Rejected => &[],
    }
}

pub fn approval_transition_allowed(current: ApprovalStatus, target: ApprovalStatus) -> bool {
    approval_allowed_targets(current).contains(&target)
}

/// A step resolves exactly once: Pending -> Approved or Rejected.
pub fn step_allowed_targets(current: StepStatus) -> &'static [StepStatus] {
    match current {
        StepStatus::Pending => &[StepStatus::Approved, StepStatus::Rejected],
        StepStatus::Approved | StepStatus::Rejected => &[],
    }
}

pub fn step_transition_allowed(current: StepStatus, target: StepStatus) -> bool {
    step_allowed_targets(current).contains(&target)
}
