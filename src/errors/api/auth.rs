use crate::errors::internal::{AccessError, AuthenticationError, InternalError, UserError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// One-time code is wrong, expired or exhausted
    #[oai(status = 401)]
    InvalidOtp(Json<ErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Signup data failed validation
    #[oai(status = 400)]
    InvalidSignup(Json<ErrorResponse>),

    /// Signup attempted for a role that cannot self-register
    #[oai(status = 403)]
    SignupForbidden(Json<ErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    /// Create an InvalidOtp error
    pub fn invalid_otp() -> Self {
        AuthError::InvalidOtp(Json(ErrorResponse {
            error: "invalid_otp".to_string(),
            message: "Invalid or expired one-time code".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidSignup error
    pub fn invalid_signup(reason: String) -> Self {
        AuthError::InvalidSignup(Json(ErrorResponse {
            error: "invalid_signup".to_string(),
            message: reason,
            status_code: 400,
        }))
    }

    /// Create a SignupForbidden error
    pub fn signup_forbidden() -> Self {
        AuthError::SignupForbidden(Json(ErrorResponse {
            error: "signup_forbidden".to_string(),
            message: "This role cannot self-register".to_string(),
            status_code: 403,
        }))
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email(email: &str) -> Self {
        AuthError::DuplicateEmail(Json(ErrorResponse {
            error: "duplicate_email".to_string(),
            message: format!("An account already exists for {}", email),
            status_code: 409,
        }))
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Authentication(AuthenticationError::ExpiredToken) => Self::expired_token(),
            InternalError::Authentication(AuthenticationError::InvalidToken { .. }) => {
                Self::invalid_token()
            }
            InternalError::Authentication(_) => Self::invalid_otp(),
            InternalError::Access(AccessError::Unauthenticated) => Self::invalid_token(),
            InternalError::User(UserError::DuplicateEmail { email }) => Self::duplicate_email(email),
            InternalError::User(UserError::InvalidField { .. }) => {
                Self::invalid_signup(err.to_string())
            }
            InternalError::User(UserError::AdminSignupForbidden) => Self::signup_forbidden(),
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidOtp(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidSignup(json)
            | AuthError::SignupForbidden(json)
            | AuthError::DuplicateEmail(json)
            | AuthError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidOtp(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidSignup(json)
            | AuthError::SignupForbidden(json)
            | AuthError::DuplicateEmail(json)
            | AuthError::InternalError(json) => json.0.status_code,
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        AuthError::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
