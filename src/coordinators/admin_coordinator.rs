use std::sync::Arc;

use sea_orm::TransactionTrait;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{EnrollmentError, UserError};
use crate::providers::{UserProfile, UserProvider};
use crate::stores::{EnrollmentStore, FeedbackGateSettings, SystemSettingsStore, UserStore};
use crate::types::db::{UserRole, enrollment, user};
use crate::types::internal::context::RequestContext;

/// Admin coordinator: user management, feedback settings and advisor recovery
///
/// Every operation requires the `admin` role.
pub struct AdminCoordinator {
    app_data: Arc<AppData>,
    user_provider: UserProvider,
    user_store: Arc<UserStore>,
    enrollment_store: Arc<EnrollmentStore>,
    settings_store: Arc<SystemSettingsStore>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_provider: UserProvider::new(app_data.user_store.clone()),
            user_store: app_data.user_store.clone(),
            enrollment_store: app_data.enrollment_store.clone(),
            settings_store: app_data.settings_store.clone(),
            app_data,
        }
    }

    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        role: Option<UserRole>,
    ) -> Result<Vec<user::Model>, InternalError> {
        ctx.require_role(&[UserRole::Admin])?;
        self.user_store.list_users(&self.app_data.db, role).await
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        role: UserRole,
        profile: UserProfile,
    ) -> Result<user::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Admin])?;
        let user = self.user_provider.create_user(&self.app_data.db, role, profile).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            admin_id = %claims.sub,
            user_id = %user.id,
            "User created by admin"
        );
        Ok(user)
    }

    /// Replace a user's profile and role; tokens already issued keep their old role until expiry
    ///
    /// When a faculty advisor stops advising the batch (role, department or
    /// year change), their pending enrollments are released in the same
    /// transaction so they reappear in the unassigned listing.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role: UserRole,
        profile: UserProfile,
    ) -> Result<user::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Admin])?;
        let txn = self
            .app_data
            .db
            .begin()
            .await
            .map_err(InternalError::transaction_begin)?;

        // Step 1: Apply the new profile
        let existing = self.user_store.require_user(&txn, user_id).await?;
        let previous = existing.clone();
        let updated = self.user_provider.update_user(&txn, existing, role, profile).await?;

        // Step 2: Release enrollments the user can no longer decide
        let stopped_advising = previous.role == UserRole::FacultyAdvisor
            && (updated.role != UserRole::FacultyAdvisor
                || updated.department != previous.department
                || updated.year != previous.year);
        let released = if stopped_advising {
            self.enrollment_store.release_advisor(&txn, &updated.id).await?
        } else {
            0
        };

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        if released > 0 {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = %updated.id,
                released,
                "Pending enrollments released from former faculty advisor"
            );
        }
        tracing::info!(
            request_id = %ctx.request_id,
            admin_id = %claims.sub,
            user_id = %updated.id,
            role = %updated.role,
            "User updated by admin"
        );
        Ok(updated)
    }

    /// Delete a user; their courses and enrollments go with them
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        let claims = ctx.require_role(&[UserRole::Admin])?;

        if !self.user_store.delete_user(&self.app_data.db, user_id).await? {
            return Err(UserError::UserIdNotFound {
                user_id: user_id.to_string(),
            }
            .into());
        }

        tracing::info!(
            request_id = %ctx.request_id,
            admin_id = %claims.sub,
            user_id = %user_id,
            "User deleted by admin"
        );
        Ok(())
    }

    pub async fn feedback_settings(&self, ctx: &RequestContext) -> Result<FeedbackGateSettings, InternalError> {
        ctx.require_role(&[UserRole::Admin])?;
        self.settings_store.get_feedback_settings(&self.app_data.db).await
    }

    pub async fn set_feedback_settings(
        &self,
        ctx: &RequestContext,
        active: bool,
        session: &str,
    ) -> Result<FeedbackGateSettings, InternalError> {
        ctx.require_role(&[UserRole::Admin])?;
        let settings = FeedbackGateSettings {
            active,
            session: session.trim().to_string(),
        };

        // Both keys change together or not at all
        let txn = self
            .app_data
            .db
            .begin()
            .await
            .map_err(InternalError::transaction_begin)?;
        self.settings_store.set_feedback_settings(&txn, &settings).await?;
        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(settings)
    }

    /// Enrollments created while no advisor matched the student
    pub async fn unassigned_enrollments(&self, ctx: &RequestContext) -> Result<Vec<enrollment::Model>, InternalError> {
        ctx.require_role(&[UserRole::Admin])?;
        self.enrollment_store.list_unassigned(&self.app_data.db).await
    }

    /// Attach a faculty advisor to an enrollment still in the pipeline
    pub async fn assign_advisor(
        &self,
        ctx: &RequestContext,
        enrollment_id: &str,
        advisor_id: &str,
    ) -> Result<enrollment::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Admin])?;
        let db = &self.app_data.db;

        let enrollment = self.enrollment_store.require_enrollment(db, enrollment_id).await?;
        if enrollment.status.is_terminal() {
            return Err(EnrollmentError::InvalidTransition {
                from: enrollment.status,
                stage: "advisor_assignment",
            }
            .into());
        }

        let advisor = self
            .user_store
            .get_user_by_id(db, advisor_id)
            .await?
            .filter(|u| u.role == UserRole::FacultyAdvisor)
            .ok_or_else(|| EnrollmentError::AdvisorNotFound {
                advisor_id: advisor_id.to_string(),
            })?;

        let updated = self.enrollment_store.set_advisor(db, enrollment, advisor.id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            admin_id = %claims.sub,
            enrollment_id = %updated.id,
            advisor_id = %advisor_id,
            "Faculty advisor assigned"
        );
        Ok(updated)
    }
}
