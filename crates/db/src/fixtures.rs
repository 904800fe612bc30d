//! Deterministic seed data for local development and end-to-end checks.

use paperflow_core::domain::approval::{ApprovalStatus, StepStatus, UserId};
use paperflow_core::domain::document::DocumentStatus;

use crate::repositories::{approval, comment, document, RepositoryError};
use crate::DbPool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub documents: usize,
    pub approvals: usize,
    pub steps: usize,
    pub comments: usize,
}

/// Seed a small, reviewable dataset: one untouched draft, one document
/// mid-review with two pending approvers, and one archived leftover. Runs
/// in a single transaction so a partial seed never survives.
pub async fn seed_demo_data(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    document::create_document(
        &mut tx,
        "Pricing experiment brief",
        Some("Draft awaiting first submission"),
    )
    .await?;
    summary.documents += 1;

    let in_review = document::create_document(
        &mut tx,
        "Q3 launch plan",
        Some("Submitted for review by ops and finance"),
    )
    .await?;
    document::set_status(&mut tx, in_review.id, DocumentStatus::Approval).await?;
    summary.documents += 1;

    let cycle = approval::create_approval(&mut tx, in_review.id, ApprovalStatus::Pending).await?;
    summary.approvals += 1;
    for approver in [UserId(7), UserId(9)] {
        approval::create_step(&mut tx, cycle.id, approver, StepStatus::Pending).await?;
        summary.steps += 1;
    }

    comment::create_comment(&mut tx, "Please check the rollout dates.", None, Some(cycle.id))
        .await?;
    summary.comments += 1;

    let archived = document::create_document(&mut tx, "Old migration notes", None).await?;
    document::archive_document(&mut tx, archived.id).await?;
    summary.documents += 1;

    tx.commit().await?;
    Ok(summary)
}
