use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{BearerAuth, authenticated_context};
use crate::coordinators::EnrollmentCoordinator;
use crate::errors::PortalError;
use crate::providers::TokenProvider;
use crate::providers::enrollment_workflow::ApprovalStage;
use crate::types::dto::enrollment::{
    EnrollmentRequest, EnrollmentResponse, TranscriptResponse, UpdateRecordRequest,
};
use crate::types::internal::Decision;

/// Enrollment request, approval and grading endpoints
pub struct EnrollmentApi {
    enrollment_coordinator: Arc<EnrollmentCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl EnrollmentApi {
    pub fn new(enrollment_coordinator: Arc<EnrollmentCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            enrollment_coordinator,
            token_provider,
        }
    }

    async fn decide(
        &self,
        req: &Request,
        auth: BearerAuth,
        enrollment_id: &str,
        stage: ApprovalStage,
        decision: Decision,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let enrollment = self
            .enrollment_coordinator
            .decide(&ctx, enrollment_id, stage, decision)
            .await?;
        Ok(Json(enrollment.into()))
    }
}

#[derive(Tags)]
enum EnrollmentTags {
    /// Enrollment approval pipeline
    Enrollment,
}

#[OpenApi(prefix_path = "/enrollment")]
impl EnrollmentApi {
    /// Request enrollment in an open course (student)
    #[oai(path = "/request", method = "post", tag = "EnrollmentTags::Enrollment")]
    async fn request(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<EnrollmentRequest>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let enrollment = self
            .enrollment_coordinator
            .request_enrollment(&ctx, &body.course_id)
            .await?;
        Ok(Json(enrollment.into()))
    }

    /// Instructor approves a request for their course
    #[oai(path = "/instructor/approve/:id", method = "post", tag = "EnrollmentTags::Enrollment")]
    async fn instructor_approve(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        self.decide(req, auth, &id.0, ApprovalStage::Instructor, Decision::Approve).await
    }

    /// Instructor rejects a request for their course
    #[oai(path = "/instructor/reject/:id", method = "post", tag = "EnrollmentTags::Enrollment")]
    async fn instructor_reject(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        self.decide(req, auth, &id.0, ApprovalStage::Instructor, Decision::Reject).await
    }

    /// Assigned faculty advisor approves an instructor-approved request
    #[oai(path = "/faculty_advisor/approve/:id", method = "post", tag = "EnrollmentTags::Enrollment")]
    async fn advisor_approve(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        self.decide(req, auth, &id.0, ApprovalStage::Advisor, Decision::Approve).await
    }

    /// Assigned faculty advisor rejects an instructor-approved request
    #[oai(path = "/faculty_advisor/reject/:id", method = "post", tag = "EnrollmentTags::Enrollment")]
    async fn advisor_reject(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        self.decide(req, auth, &id.0, ApprovalStage::Advisor, Decision::Reject).await
    }

    /// Record grade and attendance for an enrolled student (instructor)
    #[oai(path = "/:id/update-record", method = "patch", tag = "EnrollmentTags::Enrollment")]
    async fn update_record(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateRecordRequest>,
    ) -> Result<Json<EnrollmentResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let enrollment = self
            .enrollment_coordinator
            .update_record(&ctx, &id.0, body.grade, body.attendance)
            .await?;
        Ok(Json(enrollment.into()))
    }

    /// The calling student's transcript, grouped by session
    #[oai(path = "/my", method = "get", tag = "EnrollmentTags::Enrollment")]
    async fn my_enrollments(&self, req: &Request, auth: BearerAuth) -> Result<Json<TranscriptResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let transcript = self.enrollment_coordinator.transcript(&ctx).await?;
        Ok(Json(transcript))
    }

    /// Requests awaiting the calling instructor
    #[oai(path = "/instructor/pending", method = "get", tag = "EnrollmentTags::Enrollment")]
    async fn instructor_pending(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<EnrollmentResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let pending = self.enrollment_coordinator.instructor_pending(&ctx).await?;
        Ok(Json(pending.into_iter().map(Into::into).collect()))
    }

    /// Requests awaiting the calling faculty advisor
    #[oai(path = "/faculty_advisor/pending", method = "get", tag = "EnrollmentTags::Enrollment")]
    async fn advisor_pending(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<EnrollmentResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let pending = self.enrollment_coordinator.advisor_pending(&ctx).await?;
        Ok(Json(pending.into_iter().map(Into::into).collect()))
    }

    /// All enrollments of a course (owning instructor or admin)
    #[oai(path = "/course/:course_id", method = "get", tag = "EnrollmentTags::Enrollment")]
    async fn course_roster(
        &self,
        req: &Request,
        auth: BearerAuth,
        course_id: Path<String>,
    ) -> Result<Json<Vec<EnrollmentResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let roster = self.enrollment_coordinator.course_roster(&ctx, &course_id.0).await?;
        Ok(Json(roster.into_iter().map(Into::into).collect()))
    }
}
