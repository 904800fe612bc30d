//! Document editing guards plus the records that attach to documents
//! during review: comments, metrics, and RICE scores.

use paperflow_core::domain::approval::UserId;
use paperflow_core::domain::document::{Document, DocumentStatus};
use paperflow_db::{connect_with_settings, migrations, DbPool};
use paperflow_service::rice::RiceInput;
use paperflow_service::{ApprovalService, CommentService, DocumentService, MetricService, RiceService};

async fn setup() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    pool
}

async fn draft(pool: &DbPool, title: &str) -> Document {
    DocumentService::new(pool.clone())
        .create_draft(title, None)
        .await
        .expect("create draft")
        .expect("draft created")
}

async fn submit(pool: &DbPool, document: &Document) {
    ApprovalService::new(pool.clone())
        .create_approval_flow(document.id, &[UserId(7)])
        .await
        .expect("submit")
        .expect("flow created");
}

#[tokio::test]
async fn drafts_are_editable_until_submitted() {
    let pool = setup().await;
    let service = DocumentService::new(pool.clone());
    let document = draft(&pool, "first title").await;

    let updated = service
        .update_draft(document.id, "second title", Some("now with details"))
        .await
        .expect("update")
        .expect("updated");
    assert_eq!(updated.title, "second title");

    submit(&pool, &document).await;
    let denied = service.update_draft(document.id, "third title", None).await.expect("update");
    assert!(denied.is_none(), "documents under review are frozen");
}

#[tokio::test]
async fn revision_required_documents_are_editable_again() {
    let pool = setup().await;
    let service = DocumentService::new(pool.clone());
    let approvals = ApprovalService::new(pool.clone());
    let document = draft(&pool, "plan").await;
    submit(&pool, &document).await;

    let (_, steps) = approvals.get_approval_with_steps(document.id).await.expect("steps");
    approvals
        .request_revision_step(steps[0].id, UserId(7), "needs numbers")
        .await
        .expect("request revision")
        .expect("step");

    let updated =
        service.update_draft(document.id, "plan v2", None).await.expect("update").expect("doc");
    assert_eq!(updated.title, "plan v2");
}

#[tokio::test]
async fn archived_documents_read_as_absent_and_reject_edits() {
    let pool = setup().await;
    let service = DocumentService::new(pool.clone());
    let document = draft(&pool, "plan").await;

    service.archive_document(document.id).await.expect("archive").expect("archived");
    // idempotent second archive
    let again = service.archive_document(document.id).await.expect("archive again");
    assert!(again.expect("still returned").is_archived);

    assert!(service.get_document(document.id).await.expect("get").is_none());
    assert!(service.update_draft(document.id, "x", None).await.expect("update").is_none());
    assert!(service.list_documents().await.expect("list").is_empty());
}

#[tokio::test]
async fn canceled_documents_can_restart_from_draft() {
    let pool = setup().await;
    let service = DocumentService::new(pool.clone());
    let approvals = ApprovalService::new(pool.clone());
    let document = draft(&pool, "plan").await;
    submit(&pool, &document).await;

    let (_, steps) = approvals.get_approval_with_steps(document.id).await.expect("steps");
    approvals.reject_step(steps[0].id, UserId(7), "wrong quarter").await.expect("reject");

    let restored =
        service.restore_from_canceled(document.id).await.expect("restore").expect("document");
    assert_eq!(restored.status, DocumentStatus::Draft);

    // restore only applies to canceled documents
    let again = service.restore_from_canceled(document.id).await.expect("restore again");
    assert!(again.is_none());
}

#[tokio::test]
async fn comments_target_exactly_one_parent() {
    let pool = setup().await;
    let comments = CommentService::new(pool.clone());
    let approvals = ApprovalService::new(pool.clone());
    let document = draft(&pool, "plan").await;
    submit(&pool, &document).await;
    let (approval, _) = approvals.get_approval_with_steps(document.id).await.expect("approval");
    let approval = approval.expect("approval exists");

    let on_document = comments
        .add_comment("looks good", Some(document.id), None)
        .await
        .expect("comment")
        .expect("created");
    assert_eq!(on_document.document_id, Some(document.id));

    let on_approval = comments
        .add_comment("checking dates", None, Some(approval.id))
        .await
        .expect("comment")
        .expect("created");
    assert_eq!(on_approval.approval_id, Some(approval.id));

    // both targets, no target, and empty content are all refused
    assert!(comments
        .add_comment("both", Some(document.id), Some(approval.id))
        .await
        .expect("call")
        .is_none());
    assert!(comments.add_comment("neither", None, None).await.expect("call").is_none());
    assert!(comments.add_comment("  ", Some(document.id), None).await.expect("call").is_none());

    assert_eq!(comments.list_for_document(document.id).await.expect("list").len(), 1);
    assert_eq!(comments.list_for_approval(approval.id).await.expect("list").len(), 1);
}

#[tokio::test]
async fn archived_documents_reject_comments() {
    let pool = setup().await;
    let comments = CommentService::new(pool.clone());
    let documents = DocumentService::new(pool.clone());
    let document = draft(&pool, "plan").await;

    documents.archive_document(document.id).await.expect("archive");
    let denied = comments.add_comment("late", Some(document.id), None).await.expect("call");
    assert!(denied.is_none());
}

#[tokio::test]
async fn metrics_follow_the_document_guards() {
    let pool = setup().await;
    let metrics = MetricService::new(pool.clone());
    let approvals = ApprovalService::new(pool.clone());
    let document = draft(&pool, "plan").await;

    let metric = metrics
        .add_metric(document.id, "activation", "42", "%")
        .await
        .expect("add")
        .expect("created");

    // blank fields are refused before any state is touched
    assert!(metrics.add_metric(document.id, "", "1", "%").await.expect("call").is_none());

    let updated = metrics
        .update_metric(document.id, metric.id, "activation", "45", "%")
        .await
        .expect("update")
        .expect("updated");
    assert_eq!(updated.value, "45");

    // metric ids are scoped to their document
    let other = draft(&pool, "other").await;
    assert!(metrics
        .update_metric(other.id, metric.id, "activation", "50", "%")
        .await
        .expect("call")
        .is_none());
    assert!(!metrics.delete_metric(other.id, metric.id).await.expect("call"));

    // approved documents freeze their metrics
    submit(&pool, &document).await;
    let (_, steps) = approvals.get_approval_with_steps(document.id).await.expect("steps");
    approvals.approve_step(steps[0].id, UserId(7)).await.expect("approve").expect("step");
    assert!(metrics
        .add_metric(document.id, "retention", "80", "%")
        .await
        .expect("call")
        .is_none());

    assert_eq!(metrics.list_for_document(document.id).await.expect("list").len(), 1);
    assert!(!metrics.delete_metric(document.id, metric.id).await.expect("call"));
}

#[tokio::test]
async fn rice_scores_only_attach_during_review() {
    let pool = setup().await;
    let rices = RiceService::new(pool.clone());
    let document = draft(&pool, "plan").await;
    let input = RiceInput { reach: 100.0, impact: 2.0, confidence: 0.8, effort: 4.0 };

    // drafts are not scoreable
    assert!(rices.add_score(document.id, UserId(3), input).await.expect("call").is_none());

    submit(&pool, &document).await;
    let score = rices
        .add_score(document.id, UserId(3), input)
        .await
        .expect("add")
        .expect("created");
    assert_eq!(score.score, 40.0);

    // zero effort has no score
    let bad = RiceInput { effort: 0.0, ..input };
    assert!(rices.add_score(document.id, UserId(3), bad).await.expect("call").is_none());

    // only the author may revise
    let revised = RiceInput { reach: 200.0, ..input };
    assert!(rices.update_score(score.id, UserId(4), revised).await.expect("call").is_none());
    let updated = rices
        .update_score(score.id, UserId(3), revised)
        .await
        .expect("update")
        .expect("updated");
    assert_eq!(updated.score, 80.0);

    assert_eq!(rices.list_for_document(document.id).await.expect("list").len(), 1);
}
