use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid or unknown one-time code")]
    InvalidOtp,

    #[error("One-time code has expired")]
    OtpExpired,

    #[error("Too many failed attempts for this one-time code")]
    TooManyAttempts,
}
