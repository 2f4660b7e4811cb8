//! Errors returned by schedule ingestion and removal.

use crate::algorithms::Conflict;
use crate::db::StoreError;

/// Result type for schedule store operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error type for schedule ingestion and removal.
///
/// None of these leave the store modified.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The uploaded document is not a structurally valid schedule.
    #[error("Malformed schedule document: {0}")]
    MalformedInput(String),

    /// Neither the request nor the document names a student.
    #[error("Missing student name: provide one with the upload or in the document")]
    MissingStudentName,

    /// No user is logged in.
    #[error("Authentication required")]
    Unauthenticated,

    /// The user is neither an admin nor the uploader of the schedule.
    #[error("User '{username}' may not modify the schedule of '{student_name}'")]
    Denied {
        student_name: String,
        username: String,
    },

    /// The schedule conflicts with itself and the user declined to proceed.
    #[error("Upload cancelled because of {count} conflict(s) within the schedule", count = .conflicts.len())]
    UserCancelled { conflicts: Vec<Conflict> },

    /// Persisting the collection failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ScheduleError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::MissingStudentName => "MISSING_STUDENT_NAME",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Denied { .. } => "DENIED",
            Self::UserCancelled { .. } => "USER_CANCELLED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_cancelled_message_counts_conflicts() {
        let err = ScheduleError::UserCancelled {
            conflicts: vec![Conflict {
                date: "09-02".into(),
                period: "第一大节".into(),
                course_a: "A".into(),
                course_b: "B".into(),
            }],
        };
        assert!(err.to_string().contains("1 conflict(s)"));
        assert_eq!(err.code(), "USER_CANCELLED");
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: ScheduleError = StoreError::io("disk full").into();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
