use crate::errors::internal::{
    AccessError, AuthenticationError, CourseError, EnrollmentError, FeedbackError, InternalError,
    UserError,
};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error responses for the course, enrollment, feedback and admin endpoints
#[derive(ApiResponse, Debug)]
pub enum PortalError {
    /// Request failed validation or a domain precondition
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller's role or relationship to the record does not allow the action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced record does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Record is in a state that does not allow the action
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl PortalError {
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        PortalError::BadRequest(body(error, message, 400))
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        PortalError::Unauthorized(body(error, message, 401))
    }

    pub fn forbidden(error: &str, message: impl Into<String>) -> Self {
        PortalError::Forbidden(body(error, message, 403))
    }

    pub fn not_found(error: &str, message: impl Into<String>) -> Self {
        PortalError::NotFound(body(error, message, 404))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        PortalError::Conflict(body(error, message, 409))
    }

    /// Generic 500 that never exposes internal details
    fn internal_server_error() -> Self {
        PortalError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to PortalError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        let message = err.to_string();
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database error: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::User(user_err) => match user_err {
                UserError::DuplicateEmail { .. } => Self::conflict("duplicate_email", message),
                UserError::UserIdNotFound { .. } | UserError::EmailNotFound { .. } => {
                    Self::not_found("user_not_found", message)
                }
                UserError::InvalidField { .. } => Self::bad_request("invalid_field", message),
                UserError::AdminSignupForbidden => Self::forbidden("admin_signup_forbidden", message),
            },

            InternalError::Course(course_err) => match course_err {
                CourseError::CourseNotFound { .. } => Self::not_found("course_not_found", message),
                CourseError::NotOpen { .. } => Self::bad_request("course_not_open", message),
                CourseError::InvalidTransition { .. } => {
                    Self::conflict("invalid_transition", message)
                }
                CourseError::InvalidField { .. } => Self::bad_request("invalid_field", message),
            },

            InternalError::Enrollment(enrollment_err) => match enrollment_err {
                EnrollmentError::EnrollmentNotFound { .. } => {
                    Self::not_found("enrollment_not_found", message)
                }
                EnrollmentError::DuplicateRequest { .. } => {
                    Self::bad_request("duplicate_request", message)
                }
                EnrollmentError::InvalidTransition { .. } => {
                    Self::conflict("invalid_transition", message)
                }
                EnrollmentError::NotEnrolled { .. } => Self::conflict("not_enrolled", message),
                EnrollmentError::InvalidRecord { .. } => Self::bad_request("invalid_record", message),
                EnrollmentError::AdvisorNotFound { .. } => {
                    Self::not_found("advisor_not_found", message)
                }
            },

            InternalError::Feedback(feedback_err) => match feedback_err {
                FeedbackError::FeedbackClosed => Self::bad_request("feedback_closed", message),
                FeedbackError::SessionNotActive { .. } => {
                    Self::bad_request("session_not_active", message)
                }
                FeedbackError::NotEnrolled => Self::forbidden("not_enrolled", message),
                FeedbackError::AlreadySubmitted { .. } => {
                    Self::bad_request("feedback_already_submitted", message)
                }
                FeedbackError::InvalidRating { .. } | FeedbackError::CommentTooLong { .. } => {
                    Self::bad_request("invalid_feedback", message)
                }
            },

            InternalError::Access(access_err) => match access_err {
                AccessError::Unauthenticated => Self::unauthorized("unauthenticated", message),
                AccessError::RoleRequired { .. } => Self::forbidden("role_required", message),
                AccessError::NotCourseInstructor { .. } => {
                    Self::forbidden("not_course_instructor", message)
                }
                AccessError::NotAssignedAdvisor { .. } => {
                    Self::forbidden("not_assigned_advisor", message)
                }
            },

            InternalError::Authentication(auth_err) => match auth_err {
                AuthenticationError::ExpiredToken => Self::unauthorized("expired_token", message),
                _ => Self::unauthorized("invalid_token", message),
            },
        }
    }

    fn response(&self) -> &ErrorResponse {
        match self {
            PortalError::BadRequest(json)
            | PortalError::Unauthorized(json)
            | PortalError::Forbidden(json)
            | PortalError::NotFound(json)
            | PortalError::Conflict(json)
            | PortalError::InternalError(json) => &json.0,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &str {
        &self.response().error
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> &str {
        &self.response().message
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for PortalError {
    fn from(err: InternalError) -> Self {
        PortalError::from_internal_error(err)
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
