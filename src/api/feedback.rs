use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{BearerAuth, authenticated_context};
use crate::coordinators::FeedbackCoordinator;
use crate::errors::PortalError;
use crate::providers::{FeedbackSubmission, TokenProvider};
use crate::types::dto::feedback::{FeedbackResponse, FeedbackSettings, SubmitFeedbackRequest};

/// Anonymous course feedback endpoints
pub struct FeedbackApi {
    feedback_coordinator: Arc<FeedbackCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl FeedbackApi {
    pub fn new(feedback_coordinator: Arc<FeedbackCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            feedback_coordinator,
            token_provider,
        }
    }
}

#[derive(Tags)]
enum FeedbackTags {
    /// Course feedback
    Feedback,
}

#[OpenApi]
impl FeedbackApi {
    /// Submit feedback for a course in the active session (enrolled student)
    #[oai(path = "/feedback", method = "post", tag = "FeedbackTags::Feedback")]
    async fn submit(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<SubmitFeedbackRequest>,
    ) -> Result<Json<FeedbackResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let submission = FeedbackSubmission {
            course_id: body.course_id,
            content_rating: body.content_rating,
            teaching_rating: body.teaching_rating,
            overall_rating: body.overall_rating,
            comment: body.comment,
        };

        let entry = self.feedback_coordinator.submit(&ctx, submission).await?;
        Ok(Json(entry.into()))
    }

    /// Whether feedback is open, and for which session
    #[oai(path = "/feedback/status", method = "get", tag = "FeedbackTags::Feedback")]
    async fn status(&self, req: &Request, auth: BearerAuth) -> Result<Json<FeedbackSettings>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let settings = self.feedback_coordinator.status(&ctx).await?;

        Ok(Json(FeedbackSettings {
            feedback_active: settings.active,
            feedback_session: settings.session,
        }))
    }

    /// Feedback received for a course (owning instructor or admin)
    #[oai(path = "/feedback/course/:course_id", method = "get", tag = "FeedbackTags::Feedback")]
    async fn course_feedback(
        &self,
        req: &Request,
        auth: BearerAuth,
        course_id: Path<String>,
    ) -> Result<Json<Vec<FeedbackResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let entries = self.feedback_coordinator.course_feedback(&ctx, &course_id.0).await?;
        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }
}
