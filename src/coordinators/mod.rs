// Coordinators layer - Workflow orchestration
//
// Coordinators compose provider and store operations for specific API
// endpoints, and own the role and ownership checks for each workflow.

pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod course_coordinator;
pub mod enrollment_coordinator;
pub mod feedback_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::{AuthCoordinator, IssuedToken};
pub use course_coordinator::CourseCoordinator;
pub use enrollment_coordinator::EnrollmentCoordinator;
pub use feedback_coordinator::FeedbackCoordinator;

use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::types::db::{UserRole, course};
use crate::types::internal::auth::Claims;

/// Course-scoped reads are open to the course's instructor and to admins
pub(crate) fn ensure_course_access(claims: &Claims, course: &course::Model) -> Result<(), InternalError> {
    match claims.role {
        UserRole::Admin => Ok(()),
        UserRole::Instructor if course.instructor_id == claims.sub => Ok(()),
        _ => Err(AccessError::NotCourseInstructor {
            course_id: course.id.clone(),
        }
        .into()),
    }
}
