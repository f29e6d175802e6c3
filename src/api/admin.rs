use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{BearerAuth, authenticated_context};
use crate::coordinators::AdminCoordinator;
use crate::errors::PortalError;
use crate::providers::{TokenProvider, UserProfile};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::enrollment::{AssignAdvisorRequest, EnrollmentResponse};
use crate::types::dto::feedback::FeedbackSettings;
use crate::types::dto::user::{CreateUserRequest, RoleDto, UpdateUserRequest, UserResponse};

/// Admin endpoints: users, feedback settings, advisor recovery
pub struct AdminApi {
    admin_coordinator: Arc<AdminCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl AdminApi {
    pub fn new(admin_coordinator: Arc<AdminCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            admin_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum AdminTags {
    /// Administration
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List users, optionally filtered by role
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(
        &self,
        req: &Request,
        auth: BearerAuth,
        role: Query<Option<RoleDto>>,
    ) -> Result<Json<Vec<UserResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let users = self
            .admin_coordinator
            .list_users(&ctx, role.0.map(Into::into))
            .await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Create an account of any role
    #[oai(path = "/users", method = "post", tag = "AdminTags::Admin")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let profile = UserProfile {
            email: body.email,
            name: body.name,
            entry_number: body.entry_number,
            department: body.department,
            year: body.year,
            semester: body.semester,
        };

        let user = self
            .admin_coordinator
            .create_user(&ctx, body.role.into(), profile)
            .await?;
        Ok(Json(user.into()))
    }

    /// Replace a user's profile and role
    #[oai(path = "/users/:id", method = "put", tag = "AdminTags::Admin")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let profile = UserProfile {
            email: body.email,
            name: body.name,
            entry_number: body.entry_number,
            department: body.department,
            year: body.year,
            semester: body.semester,
        };

        let user = self
            .admin_coordinator
            .update_user(&ctx, &id.0, body.role.into(), profile)
            .await?;
        Ok(Json(user.into()))
    }

    #[oai(path = "/users/:id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        self.admin_coordinator.delete_user(&ctx, &id.0).await?;

        Ok(Json(MessageResponse {
            message: format!("User {} deleted", id.0),
        }))
    }

    #[oai(path = "/feedback-settings", method = "get", tag = "AdminTags::Admin")]
    async fn get_feedback_settings(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<FeedbackSettings>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let settings = self.admin_coordinator.feedback_settings(&ctx).await?;

        Ok(Json(FeedbackSettings {
            feedback_active: settings.active,
            feedback_session: settings.session,
        }))
    }

    /// Open or close feedback collection and choose its session
    #[oai(path = "/feedback-settings", method = "put", tag = "AdminTags::Admin")]
    async fn set_feedback_settings(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<FeedbackSettings>,
    ) -> Result<Json<FeedbackSettings>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let settings = self
            .admin_coordinator
            .set_feedback_settings(&ctx, body.feedback_active, &body.feedback_session)
            .await?;

        Ok(Json(FeedbackSettings {
            feedback_active: settings.active,
            feedback_session: settings.session,
        }))
    }

    /// Enrollments created without a faculty advisor
    #[oai(path = "/enrollments/unassigned", method = "get", tag = "AdminTags::Admin")]
    async fn unassigned_enrollments(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<EnrollmentResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let enrollments = self.admin_coordinator.unassigned_enrollments(&ctx).await?;
        Ok(Json(enrollments.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/enrollments/:id/assign-advisor", method = "post", tag = "AdminTags::Admin")]
    async fn assign_advisor(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<AssignAdvisorRequest>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let enrollment = self
            .admin_coordinator
            .assign_advisor(&ctx, &id.0, &body.advisor_id)
            .await?;
        Ok(Json(enrollment.into()))
    }
}
