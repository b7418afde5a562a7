//! Review units and pending submission records.

use serde::Serialize;
use utoipa::ToSchema;

use super::user::SubmitterIdentity;

/// Lifecycle status of a review unit.
///
/// A unit opens when a submission is published for review; it is merged by
/// an external reviewer action or reverted through the revert workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Open,
    Merged,
    Reverted,
}

/// Summary of one review unit, as returned by the submit listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewSummary {
    /// Branch name carrying the unit in the canonical repository
    pub branch: String,
    /// Review unit title, `<userId>_<timestamp>`
    pub title: String,
    pub status: ReviewStatus,
    /// Head commit of the unit
    pub commit: String,
    /// Commit message supplied at submission
    pub message: String,
}

/// Kind of a pending (non-versioned) submission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Submit,
    Edit,
    Remove,
    Draft,
}

impl SubmissionKind {
    /// Classify a queue file by its name convention.
    pub fn from_filename(name: &str) -> Self {
        if name.starts_with("submit-") {
            Self::Submit
        } else if name.starts_with("edit-") {
            Self::Edit
        } else if name.starts_with("remove-") {
            Self::Remove
        } else {
            Self::Draft
        }
    }
}

/// A pending submission record awaiting administrator action.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingRecord {
    pub filename: String,
    pub kind: SubmissionKind,
    /// Name of the service in the record body, when the body parses
    pub service_name: Option<String>,
    pub submitter: SubmitterIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_name_convention() {
        assert_eq!(SubmissionKind::from_filename("submit-42.json"), SubmissionKind::Submit);
        assert_eq!(SubmissionKind::from_filename("edit-42.json"), SubmissionKind::Edit);
        assert_eq!(SubmissionKind::from_filename("remove-42.json"), SubmissionKind::Remove);
        assert_eq!(SubmissionKind::from_filename("a1b2c3"), SubmissionKind::Draft);
    }
}
