use thiserror::Error;

use crate::types::db::EnrollmentStatus;

#[derive(Error, Debug)]
pub enum EnrollmentError {
    #[error("Enrollment not found: {enrollment_id}")]
    EnrollmentNotFound { enrollment_id: String },

    #[error("Enrollment already requested for course {course_id} in session {session}")]
    DuplicateRequest { course_id: String, session: String },

    #[error("Enrollment in status {from} cannot be decided at the {stage} stage")]
    InvalidTransition {
        from: EnrollmentStatus,
        stage: &'static str,
    },

    #[error("Records can only be updated for enrolled students (status is {status})")]
    NotEnrolled { status: EnrollmentStatus },

    #[error("Invalid {field}: {reason}")]
    InvalidRecord { field: String, reason: String },

    #[error("Faculty advisor not found: {advisor_id}")]
    AdvisorNotFound { advisor_id: String },
}
