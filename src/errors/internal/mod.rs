use thiserror::Error;

pub mod access;
pub mod authentication;
pub mod course;
pub mod database;
pub mod enrollment;
pub mod feedback;
pub mod user;

pub use access::AccessError;
pub use authentication::AuthenticationError;
pub use course::CourseError;
pub use database::DatabaseError;
pub use enrollment::EnrollmentError;
pub use feedback::FeedbackError;
pub use user::UserError;

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (one enum per area).
/// Not exposed via API - endpoints must convert to PortalError or AuthError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Course(#[from] CourseError),

    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
}

impl InternalError {
    /// Create a database error with the failed operation name
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    /// Create a parse error with context
    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// Create a crypto error with context
    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True when the error is a store-level unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            InternalError::Database(DatabaseError::Operation { source, .. }) => matches!(
                source.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ),
            _ => false,
        }
    }
}
