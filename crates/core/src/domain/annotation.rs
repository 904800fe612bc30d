//! Records that attach to documents during review: free-form comments,
//! named metrics, and RICE prioritization scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::approval::{ApprovalId, UserId};
use crate::domain::document::DocumentId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiceScoreId(pub i64);

/// A comment targets either a document or an approval, never both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub document_id: Option<DocumentId>,
    pub approval_id: Option<ApprovalId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetric {
    pub id: MetricId,
    pub document_id: DocumentId,
    pub name: String,
    pub value: String,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiceScore {
    pub id: RiceScoreId,
    pub document_id: DocumentId,
    pub author_id: UserId,
    pub reach: f64,
    pub impact: f64,
    pub confidence: f64,
    pub effort: f64,
    pub score: f64,
}

/// RICE formula: reach x impact x confidence / effort. Non-positive effort
/// has no meaningful score.
pub fn rice_score(reach: f64, impact: f64, confidence: f64, effort: f64) -> Option<f64> {
    if effort <= 0.0 {
        return None;
    }
    Some(reach * impact * confidence / effort)
}

#[cfg(test)]
mod tests {
    use super::rice_score;

    #[test]
    fn rice_score_divides_by_effort() {
        assert_eq!(rice_score(100.0, 2.0, 0.8, 4.0), Some(40.0));
    }

    #[test]
    fn rice_score_rejects_non_positive_effort() {
        assert_eq!(rice_score(100.0, 2.0, 0.8, 0.0), None);
        assert_eq!(rice_score(100.0, 2.0, 0.8, -1.0), None);
    }
}
