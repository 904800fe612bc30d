use crate::domain::approval::{ApprovalStatus, StepStatus};
use crate::domain::document::DocumentStatus;

/// What an approval and its document *should* become, given the current
/// step set. Applying these targets (and gating them against the transition
/// tables) is left to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateTargets {
    pub approval: ApprovalStatus,
    pub document: DocumentStatus,
}

/// Derive approval/document targets from the step statuses.
///
/// A single rejection vetoes the whole approval no matter how many other
/// steps are approved. The non-emptiness check on the all-approved branch is
/// deliberate: an approval with zero steps stays pending, it does not count
/// as vacuously approved.
pub fn aggregate_targets(steps: &[StepStatus]) -> AggregateTargets {
    if steps.iter().any(|status| *status == StepStatus::Rejected) {
        AggregateTargets {
            approval: ApprovalStatus::Rejected,
            document: DocumentStatus::RevisionRequired,
        }
    } else if !steps.is_empty() && steps.iter().all(|status| *status == StepStatus::Approved) {
        AggregateTargets { approval: ApprovalStatus::Approved, document: DocumentStatus::Approved }
    } else {
        AggregateTargets { approval: ApprovalStatus::Pending, document: DocumentStatus::Approval }
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate_targets, AggregateTargets};
    use crate::domain::approval::{ApprovalStatus, StepStatus};
    use crate::domain::document::DocumentStatus;

    #[test]
    fn all_approved_resolves_both_to_approved() {
        let targets = aggregate_targets(&[StepStatus::Approved, StepStatus::Approved]);
        assert_eq!(
            targets,
            AggregateTargets {
                approval: ApprovalStatus::Approved,
                document: DocumentStatus::Approved,
            }
        );
    }

    #[test]
    fn one_rejection_vetoes_regardless_of_position_or_approvals() {
        let orderings: [&[StepStatus]; 3] = [
            &[StepStatus::Rejected, StepStatus::Approved, StepStatus::Approved],
            &[StepStatus::Approved, StepStatus::Rejected, StepStatus::Approved],
            &[StepStatus::Approved, StepStatus::Approved, StepStatus::Rejected],
        ];
        for steps in orderings {
            let targets = aggregate_targets(steps);
            assert_eq!(targets.approval, ApprovalStatus::Rejected);
            assert_eq!(targets.document, DocumentStatus::RevisionRequired);
        }
    }

    #[test]
    fn rejection_wins_even_over_pending_steps() {
        let targets = aggregate_targets(&[StepStatus::Pending, StepStatus::Rejected]);
        assert_eq!(targets.approval, ApprovalStatus::Rejected);
    }

    #[test]
    fn pending_steps_keep_everything_in_flight() {
        let targets = aggregate_targets(&[StepStatus::Approved, StepStatus::Pending]);
        assert_eq!(
            targets,
            AggregateTargets {
                approval: ApprovalStatus::Pending,
                document: DocumentStatus::Approval,
            }
        );
    }

    #[test]
    fn empty_step_set_is_never_vacuously_approved() {
        let targets = aggregate_targets(&[]);
        assert_eq!(targets.approval, ApprovalStatus::Pending);
        assert_eq!(targets.document, DocumentStatus::Approval);
    }
}
