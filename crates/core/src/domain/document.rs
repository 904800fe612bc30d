use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub i64);

/// Lifecycle status of a document. `Approved` is terminal; archival is an
/// orthogonal flag on [`Document`], not a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    Approval,
    RevisionRequired,
    Canceled,
    Approved,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Approval => "APPROVAL",
            Self::RevisionRequired => "REVISION_REQUIRED",
            Self::Canceled => "CANCELED",
            Self::Approved => "APPROVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Self::Draft),
            "APPROVAL" => Some(Self::Approval),
            "REVISION_REQUIRED" => Some(Self::RevisionRequired),
            "CANCELED" => Some(Self::Canceled),
            "APPROVED" => Some(Self::Approved),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub description: Option<String>,
    pub status: DocumentStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::DocumentStatus;

    #[test]
    fn status_round_trips_through_wire_strings() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::Approval,
            DocumentStatus::RevisionRequired,
            DocumentStatus::Canceled,
            DocumentStatus::Approved,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert_eq!(DocumentStatus::parse("PUBLISHED"), None);
        assert_eq!(DocumentStatus::parse("draft"), None);
    }
}
