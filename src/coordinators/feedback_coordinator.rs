use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::ensure_course_access;
use crate::errors::InternalError;
use crate::providers::{FeedbackGate, FeedbackSubmission};
use crate::stores::{CourseStore, FeedbackGateSettings, FeedbackStore, SystemSettingsStore};
use crate::types::db::{UserRole, feedback};
use crate::types::internal::context::RequestContext;

/// Orchestrates anonymous course feedback
pub struct FeedbackCoordinator {
    app_data: Arc<AppData>,
    gate: FeedbackGate,
    course_store: Arc<CourseStore>,
    feedback_store: Arc<FeedbackStore>,
    settings_store: Arc<SystemSettingsStore>,
}

impl FeedbackCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let gate = FeedbackGate::new(
            app_data.settings_store.clone(),
            app_data.course_store.clone(),
            app_data.enrollment_store.clone(),
            app_data.feedback_store.clone(),
        );

        Self {
            gate,
            course_store: app_data.course_store.clone(),
            feedback_store: app_data.feedback_store.clone(),
            settings_store: app_data.settings_store.clone(),
            app_data,
        }
    }

    pub async fn submit(
        &self,
        ctx: &RequestContext,
        submission: FeedbackSubmission,
    ) -> Result<feedback::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Student])?;

        let entry = self.gate.submit(&self.app_data.db, &claims.sub, submission).await?;

        // Feedback is anonymous: no student id in the log
        tracing::info!(
            request_id = %ctx.request_id,
            course_id = %entry.course_id,
            session = %entry.session,
            "Feedback recorded"
        );
        Ok(entry)
    }

    pub async fn status(&self, ctx: &RequestContext) -> Result<FeedbackGateSettings, InternalError> {
        ctx.require_claims()?;
        self.settings_store.get_feedback_settings(&self.app_data.db).await
    }

    /// Feedback for a course; owning instructor or admin
    pub async fn course_feedback(
        &self,
        ctx: &RequestContext,
        course_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor, UserRole::Admin])?;
        let course = self.course_store.require_course(&self.app_data.db, course_id).await?;
        ensure_course_access(claims, &course)?;

        self.feedback_store.list_for_course(&self.app_data.db, &course.id).await
    }
}
