use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("User ID not found: {user_id}")]
    UserIdNotFound { user_id: String },

    #[error("No account for email: {email}")]
    EmailNotFound { email: String },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Admin accounts cannot be created through signup")]
    AdminSignupForbidden,
}

impl UserError {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
