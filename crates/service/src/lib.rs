//! Transactional service layer for the document approval workflow.
//!
//! Every operation runs as one unit of work against the store: a single
//! transaction that either commits all of its reads and writes or none.
//! Domain-rule failures (not found, wrong approver, illegal transition,
//! validation) come back as `Ok(None)`; only storage failures surface as
//! errors.

pub mod approval;
pub mod comment;
pub mod document;
pub mod errors;
pub mod metric;
pub mod rice;

pub use approval::ApprovalService;
pub use comment::CommentService;
pub use document::DocumentService;
pub use errors::ServiceError;
pub use metric::MetricService;
pub use rice::RiceService;
