use thiserror::Error;

use crate::types::db::UserRole;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Role {actual} may not perform this action (requires {required})")]
    RoleRequired { required: String, actual: UserRole },

    #[error("Caller is not the instructor of course {course_id}")]
    NotCourseInstructor { course_id: String },

    #[error("Caller is not the faculty advisor assigned to enrollment {enrollment_id}")]
    NotAssignedAdvisor { enrollment_id: String },
}
