use thiserror::Error;

use crate::types::db::CourseStatus;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: String },

    #[error("Course {course_id} is not open for enrollment")]
    NotOpen { course_id: String },

    #[error("Course cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: CourseStatus, to: CourseStatus },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl CourseError {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
