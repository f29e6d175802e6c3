use std::net::IpAddr;

use poem::Request;

use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::types::db::UserRole;
use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries who is calling and where the call came from, so coordinators can
/// authorize and every layer can log with the same request id.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request carried a valid JWT
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    pub source: RequestSource,

    /// Actor who initiated the operation (user id, or `cli:`/`system:` label)
    pub actor_id: String,
}

impl RequestContext {
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Unauthenticated API context with the client IP and a fresh request id
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Claims of the authenticated caller
    pub fn require_claims(&self) -> Result<&Claims, InternalError> {
        match (&self.claims, self.authenticated) {
            (Some(claims), true) => Ok(claims),
            _ => Err(AccessError::Unauthenticated.into()),
        }
    }

    /// Claims of the caller, provided their role is one of `allowed`
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<&Claims, InternalError> {
        let claims = self.require_claims()?;
        if allowed.contains(&claims.role) {
            return Ok(claims);
        }

        let required = allowed
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(AccessError::RoleRequired {
            required,
            actual: claims.role,
        }
        .into())
    }

    /// Id of the authenticated caller
    pub fn user_id(&self) -> Result<&str, InternalError> {
        Ok(self.require_claims()?.sub.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(role: UserRole) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: "user@example.edu".to_string(),
            role,
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_for_cli_context() {
        let ctx = RequestContext::for_cli("create-admin");

        assert_eq!(ctx.source, RequestSource::CLI);
        assert_eq!(ctx.actor_id, "cli:create-admin");
        assert!(!ctx.authenticated);
        assert!(ctx.ip_address.is_none());
    }

    #[test]
    fn test_with_auth_sets_actor() {
        let ctx = RequestContext::for_system("test").with_auth(claims_for(UserRole::Student));

        assert!(ctx.authenticated);
        assert_eq!(ctx.actor_id, "user-1");
        assert_eq!(ctx.user_id().unwrap(), "user-1");
    }

    #[test]
    fn test_require_claims_unauthenticated() {
        let ctx = RequestContext::for_system("test");

        assert!(matches!(
            ctx.require_claims(),
            Err(InternalError::Access(AccessError::Unauthenticated))
        ));
    }

    #[test]
    fn test_require_role_allows_listed_role() {
        let ctx = RequestContext::for_system("test").with_auth(claims_for(UserRole::Instructor));

        let claims = ctx.require_role(&[UserRole::Instructor, UserRole::Admin]).unwrap();
        assert_eq!(claims.role, UserRole::Instructor);
    }

    #[test]
    fn test_require_role_rejects_other_role() {
        let ctx = RequestContext::for_system("test").with_auth(claims_for(UserRole::Student));

        match ctx.require_role(&[UserRole::Admin, UserRole::FacultyAdvisor]) {
            Err(InternalError::Access(AccessError::RoleRequired { required, actual })) => {
                assert_eq!(required, "admin or faculty_advisor");
                assert_eq!(actual, UserRole::Student);
            }
            other => panic!("expected RoleRequired, got {:?}", other),
        }
    }
}
