use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{AuthenticationError, UserError};
use crate::providers::{OtpProvider, TokenProvider, UserProfile, UserProvider};
use crate::stores::UserStore;
use crate::types::db::{UserRole, user};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

/// Access token handed out after a successful OTP verification
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
    pub expires_in: i64,
}

/// Orchestrates signup and the email one-time-code login
pub struct AuthCoordinator {
    app_data: Arc<AppData>,
    user_store: Arc<UserStore>,
    user_provider: UserProvider,
    otp_provider: OtpProvider,
    token_provider: Arc<TokenProvider>,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        // Step 1: Create providers from AppData components
        let user_provider = UserProvider::new(app_data.user_store.clone());
        let otp_provider = OtpProvider::new(
            app_data.otp_store.clone(),
            app_data.otp_sender.clone(),
            app_data.secret_manager.otp_pepper().to_string(),
            app_data.otp_expiration_minutes,
        );

        // Step 2: Extract stores and assign providers
        Self {
            user_store: app_data.user_store.clone(),
            token_provider: app_data.token_provider.clone(),
            user_provider,
            otp_provider,
            app_data,
        }
    }

    /// Useful for the API layer, which validates bearer tokens before dispatch
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Self-registration for students, instructors and faculty advisors
    pub async fn signup(
        &self,
        ctx: &RequestContext,
        role: UserRole,
        profile: UserProfile,
    ) -> Result<user::Model, InternalError> {
        if role == UserRole::Admin {
            return Err(UserError::AdminSignupForbidden.into());
        }

        let user = self
            .user_provider
            .create_user(&self.app_data.db, role, profile)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            role = %user.role,
            "User signed up"
        );
        Ok(user)
    }

    /// Issue a login code when the email belongs to an account
    ///
    /// Unknown emails succeed silently so the endpoint does not reveal which
    /// addresses are registered.
    pub async fn request_otp(&self, ctx: &RequestContext, email: &str) -> Result<(), InternalError> {
        let email = UserProvider::normalize_email(email)?;

        match self.user_store.get_user_by_email(&self.app_data.db, &email).await? {
            Some(_) => {
                self.otp_provider.issue(&self.app_data.db, &email).await?;
                tracing::info!(request_id = %ctx.request_id, email = %email, "One-time code requested");
            }
            None => {
                tracing::debug!(request_id = %ctx.request_id, email = %email, "One-time code requested for unknown email");
            }
        }

        Ok(())
    }

    /// Verify a login code and issue an access token
    pub async fn verify_otp(
        &self,
        ctx: &RequestContext,
        email: &str,
        code: &str,
    ) -> Result<IssuedToken, InternalError> {
        // Step 1: Check the code; malformed emails cannot hold one
        let email = UserProvider::normalize_email(email).map_err(|_| AuthenticationError::InvalidOtp)?;
        self.otp_provider.verify(&self.app_data.db, &email, code).await?;

        // Step 2: The account may have been removed since the code was issued
        let user = self
            .user_store
            .get_user_by_email(&self.app_data.db, &email)
            .await?
            .ok_or(AuthenticationError::InvalidOtp)?;

        // Step 3: Issue the access token
        let (token, claims) = self.token_provider.generate_jwt(&user)?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            jti = %claims.jti,
            "Access token issued"
        );

        Ok(IssuedToken {
            token,
            claims,
            expires_in: self.token_provider.expires_in_seconds(),
        })
    }
}
