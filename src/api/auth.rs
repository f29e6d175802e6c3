use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{BearerAuth, authenticated_context};
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::providers::{TokenProvider, UserProfile};
use crate::types::dto::auth::{OtpRequest, OtpVerifyRequest, SignupRequest, TokenResponse, WhoAmIResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl AuthApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self {
            token_provider: auth_coordinator.token_provider(),
            auth_coordinator,
        }
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Signup and one-time-code login
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a student, instructor or faculty advisor account
    #[oai(path = "/signup", method = "post", tag = "AuthTags::Authentication")]
    async fn signup(&self, req: &Request, body: Json<SignupRequest>) -> Result<Json<UserResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let body = body.0;
        let profile = UserProfile {
            email: body.email,
            name: body.name,
            entry_number: body.entry_number,
            department: body.department,
            year: body.year,
            semester: body.semester,
        };

        let user = self.auth_coordinator.signup(&ctx, body.role.into(), profile).await?;
        Ok(Json(user.into()))
    }

    /// Send a one-time login code to the address, if it has an account
    #[oai(path = "/otp/request", method = "post", tag = "AuthTags::Authentication")]
    async fn request_otp(&self, req: &Request, body: Json<OtpRequest>) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        self.auth_coordinator.request_otp(&ctx, &body.email).await?;

        Ok(Json(MessageResponse {
            message: "If the address is registered, a login code has been sent".to_string(),
        }))
    }

    /// Exchange a one-time code for an access token
    #[oai(path = "/otp/verify", method = "post", tag = "AuthTags::Authentication")]
    async fn verify_otp(&self, req: &Request, body: Json<OtpVerifyRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);
        let issued = self.auth_coordinator.verify_otp(&ctx, &body.email, &body.code).await?;

        Ok(Json(TokenResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user_id: issued.claims.sub,
            role: issued.claims.role.into(),
        }))
    }

    /// Verify JWT and return the caller's identity
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let claims = ctx.require_claims()?;

        Ok(Json(WhoAmIResponse {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            role: claims.role.into(),
            expires_at: claims.exp,
        }))
    }
}
