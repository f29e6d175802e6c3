use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Feedback collection is closed")]
    FeedbackClosed,

    #[error("Course session {course_session} is not the active feedback session ({active_session})")]
    SessionNotActive {
        course_session: String,
        active_session: String,
    },

    #[error("Only enrolled students can submit feedback")]
    NotEnrolled,

    #[error("Feedback already submitted for course {course_id} in session {session}")]
    AlreadySubmitted { course_id: String, session: String },

    #[error("Invalid {field}: {value} is outside 1..=5")]
    InvalidRating { field: &'static str, value: i32 },

    #[error("Comment exceeds {max} characters")]
    CommentTooLong { max: usize },
}
