// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod courses;
pub mod enrollment;
pub mod feedback;
pub mod health;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use courses::CourseApi;
pub use enrollment::EnrollmentApi;
pub use feedback::FeedbackApi;
pub use health::HealthApi;

use poem::Request;
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// Build the request context for an endpoint that requires a valid token
pub(crate) fn authenticated_context(
    req: &Request,
    auth: &BearerAuth,
    token_provider: &TokenProvider,
) -> Result<RequestContext, InternalError> {
    let claims = token_provider.validate_jwt(&auth.0.token)?;
    Ok(RequestContext::from_request(req).with_auth(claims))
}
