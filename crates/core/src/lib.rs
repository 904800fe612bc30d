pub mod config;
pub mod domain;
pub mod workflow;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use domain::approval::{
    Approval, ApprovalId, ApprovalStatus, ApprovalStep, StepId, StepStatus, UserId,
};
pub use domain::document::{Document, DocumentId, DocumentStatus};
pub use workflow::aggregate::{aggregate_targets, AggregateTargets};
pub use workflow::transitions::{
    approval_transition_allowed, document_transition_allowed, step_transition_allowed,
};
