use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::FeedbackError;
use crate::stores::{CourseStore, EnrollmentStore, FeedbackStore, SystemSettingsStore};
use crate::types::db::{EnrollmentStatus, feedback};

pub const MAX_COMMENT_LENGTH: usize = 2000;

/// A student's feedback as submitted
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub course_id: String,
    pub content_rating: i32,
    pub teaching_rating: i32,
    pub overall_rating: i32,
    pub comment: String,
}

/// Decides whether a feedback submission is accepted and records it
///
/// Checks run in a fixed order and the first failure wins; a refused
/// submission writes nothing.
pub struct FeedbackGate {
    settings_store: Arc<SystemSettingsStore>,
    course_store: Arc<CourseStore>,
    enrollment_store: Arc<EnrollmentStore>,
    feedback_store: Arc<FeedbackStore>,
}

impl FeedbackGate {
    pub fn new(
        settings_store: Arc<SystemSettingsStore>,
        course_store: Arc<CourseStore>,
        enrollment_store: Arc<EnrollmentStore>,
        feedback_store: Arc<FeedbackStore>,
    ) -> Self {
        Self {
            settings_store,
            course_store,
            enrollment_store,
            feedback_store,
        }
    }

    pub async fn submit(
        &self,
        conn: &impl ConnectionTrait,
        student_id: &str,
        submission: FeedbackSubmission,
    ) -> Result<feedback::Model, InternalError> {
        // Step 1: collection must be open
        let settings = self.settings_store.get_feedback_settings(conn).await?;
        if !settings.active {
            return Err(FeedbackError::FeedbackClosed.into());
        }

        // Step 2: course must exist and belong to the active session
        let course = self.course_store.require_course(conn, &submission.course_id).await?;
        if course.session != settings.session {
            return Err(FeedbackError::SessionNotActive {
                course_session: course.session,
                active_session: settings.session,
            }
            .into());
        }

        // Step 3: only enrolled students may speak
        let enrolled = self
            .enrollment_store
            .find_for_student(conn, student_id, &course.id, &course.session)
            .await?
            .is_some_and(|e| e.status == EnrollmentStatus::Enrolled);
        if !enrolled {
            return Err(FeedbackError::NotEnrolled.into());
        }

        // Step 4: one submission per course and session
        if self.feedback_store.exists_for(conn, &course.id, &course.session).await? {
            return Err(FeedbackError::AlreadySubmitted {
                course_id: course.id,
                session: course.session,
            }
            .into());
        }

        // Step 5: content checks
        validate_submission(&submission)?;

        let entry = feedback::Model {
            id: Uuid::new_v4().to_string(),
            course_id: course.id,
            session: course.session,
            instructor_id: course.instructor_id,
            content_rating: submission.content_rating,
            teaching_rating: submission.teaching_rating,
            overall_rating: submission.overall_rating,
            comment: submission.comment,
            created_at: Utc::now().timestamp(),
        };

        self.feedback_store.create_feedback(conn, entry).await
    }
}

/// Ratings must lie in 1..=5 and the comment within `MAX_COMMENT_LENGTH` characters
pub fn validate_submission(submission: &FeedbackSubmission) -> Result<(), FeedbackError> {
    let ratings = [
        ("contentRating", submission.content_rating),
        ("teachingRating", submission.teaching_rating),
        ("overallRating", submission.overall_rating),
    ];
    for (field, value) in ratings {
        if !(1..=5).contains(&value) {
            return Err(FeedbackError::InvalidRating { field, value });
        }
    }

    if submission.comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(FeedbackError::CommentTooLong {
            max: MAX_COMMENT_LENGTH,
        });
    }

    Ok(())
}
