use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::AuthenticationError;
use crate::providers::CryptoProvider;
use crate::stores::OtpStore;

/// Failed verifications allowed before a code is locked
pub const MAX_OTP_ATTEMPTS: i32 = 5;

/// Delivers one-time codes to users
pub trait OtpSender: Send + Sync {
    fn send(&self, email: &str, code: &str) -> Result<(), InternalError>;
}

/// Sender that writes the code to the application log
///
/// Email delivery is not part of this service. The code itself is only
/// logged at `debug`; `info` records that a code went out.
pub struct LogOtpSender;

impl OtpSender for LogOtpSender {
    fn send(&self, email: &str, code: &str) -> Result<(), InternalError> {
        tracing::info!(email = %email, "One-time login code issued");
        tracing::debug!(email = %email, code = %code, "One-time login code");
        Ok(())
    }
}

/// Issues and verifies email one-time codes
pub struct OtpProvider {
    crypto: CryptoProvider,
    otp_store: Arc<OtpStore>,
    sender: Arc<dyn OtpSender>,
    pepper: String,
    expiration_minutes: i64,
}

impl OtpProvider {
    pub fn new(
        otp_store: Arc<OtpStore>,
        sender: Arc<dyn OtpSender>,
        pepper: String,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            crypto: CryptoProvider::new(),
            otp_store,
            sender,
            pepper,
            expiration_minutes,
        }
    }

    /// Generate a code for `email`, store its hash and hand it to the sender
    pub async fn issue(&self, conn: &impl ConnectionTrait, email: &str) -> Result<(), InternalError> {
        let code = self.crypto.generate_otp_code();
        let code_hash = self.crypto.hmac_sha256(&self.pepper, &code)?;
        let expires_at = Utc::now().timestamp() + self.expiration_minutes * 60;

        self.otp_store
            .replace_code(conn, email, code_hash, expires_at)
            .await?;
        self.sender.send(email, &code)?;

        Ok(())
    }

    /// Check `code` against the stored hash for `email`
    ///
    /// Mismatches count against the attempt limit; a match consumes the code.
    pub async fn verify(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        code: &str,
    ) -> Result<(), InternalError> {
        let stored = self
            .otp_store
            .get_code(conn, email)
            .await?
            .ok_or(AuthenticationError::InvalidOtp)?;

        if stored.expires_at <= Utc::now().timestamp() {
            return Err(AuthenticationError::OtpExpired.into());
        }

        if stored.attempts >= MAX_OTP_ATTEMPTS {
            return Err(AuthenticationError::TooManyAttempts.into());
        }

        let presented = self.crypto.hmac_sha256(&self.pepper, code.trim())?;
        if !self.crypto.hashes_match(&stored.code_hash, &presented) {
            self.otp_store.record_failed_attempt(conn, email).await?;
            tracing::warn!(email = %email, attempts = stored.attempts + 1, "One-time code mismatch");
            return Err(AuthenticationError::InvalidOtp.into());
        }

        self.otp_store.delete_code(conn, email).await?;
        Ok(())
    }
}
