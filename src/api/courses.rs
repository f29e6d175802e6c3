use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{BearerAuth, authenticated_context};
use crate::coordinators::CourseCoordinator;
use crate::errors::PortalError;
use crate::providers::TokenProvider;
use crate::providers::course_lifecycle::CourseOffer;
use crate::stores::CourseFilter;
use crate::types::dto::course::{CourseResponse, CourseStatusDto, OfferCourseRequest};
use crate::types::internal::Decision;

/// Course offering and review endpoints
pub struct CourseApi {
    course_coordinator: Arc<CourseCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl CourseApi {
    pub fn new(course_coordinator: Arc<CourseCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            course_coordinator,
            token_provider,
        }
    }

    async fn review(
        &self,
        req: &Request,
        auth: BearerAuth,
        course_id: &str,
        decision: Decision,
    ) -> Result<Json<CourseResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let course = self
            .course_coordinator
            .review_course(&ctx, course_id, decision)
            .await?;
        Ok(Json(course.into()))
    }
}

#[derive(Tags)]
enum CourseTags {
    /// Course catalogue and lifecycle
    Courses,
}

#[OpenApi]
impl CourseApi {
    /// Offer a new course (instructor); it awaits approval
    #[oai(path = "/courses/offer", method = "post", tag = "CourseTags::Courses")]
    async fn offer(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<OfferCourseRequest>,
    ) -> Result<Json<CourseResponse>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let offer = CourseOffer {
            course_code: body.course_code,
            title: body.title,
            department: body.department,
            year: body.year,
            ltp: body.ltp,
            session: body.session,
        };

        let course = self.course_coordinator.offer_course(&ctx, offer).await?;
        Ok(Json(course.into()))
    }

    /// Approve a pending course (faculty advisor or admin)
    #[oai(path = "/courses/approve/:id", method = "post", tag = "CourseTags::Courses")]
    async fn approve(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<CourseResponse>, PortalError> {
        self.review(req, auth, &id.0, Decision::Approve).await
    }

    /// Reject a pending course (faculty advisor or admin)
    #[oai(path = "/courses/reject/:id", method = "post", tag = "CourseTags::Courses")]
    async fn reject(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<CourseResponse>, PortalError> {
        self.review(req, auth, &id.0, Decision::Reject).await
    }

    /// List courses; students only see open ones
    #[oai(path = "/courses", method = "get", tag = "CourseTags::Courses")]
    async fn list(
        &self,
        req: &Request,
        auth: BearerAuth,
        status: Query<Option<CourseStatusDto>>,
        session: Query<Option<String>>,
        department: Query<Option<String>>,
    ) -> Result<Json<Vec<CourseResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let filter = CourseFilter {
            status: status.0.map(Into::into),
            session: session.0,
            department: department.0,
            instructor_id: None,
        };

        let courses = self.course_coordinator.list_courses(&ctx, filter).await?;
        Ok(Json(courses.into_iter().map(Into::into).collect()))
    }

    /// Courses offered by the calling instructor
    #[oai(path = "/courses/my", method = "get", tag = "CourseTags::Courses")]
    async fn my_courses(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<CourseResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let courses = self.course_coordinator.my_courses(&ctx).await?;
        Ok(Json(courses.into_iter().map(Into::into).collect()))
    }

    /// Courses awaiting review
    #[oai(path = "/courses/pending", method = "get", tag = "CourseTags::Courses")]
    async fn pending(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<CourseResponse>>, PortalError> {
        let ctx = authenticated_context(req, &auth, &self.token_provider)?;
        let courses = self.course_coordinator.pending_courses(&ctx).await?;
        Ok(Json(courses.into_iter().map(Into::into).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{bearer_for, create_test_user, setup_test_app_data};
    use crate::types::db::UserRole;

    fn offer_body(code: &str) -> Json<OfferCourseRequest> {
        Json(OfferCourseRequest {
            course_code: code.to_string(),
            title: "Operating Systems".to_string(),
            department: "CSE".to_string(),
            year: 3,
            ltp: "3-1-2".to_string(),
            session: "2025-I".to_string(),
        })
    }

    #[tokio::test]
    async fn test_student_listing_only_shows_open_courses() {
        let (app_data, _sender) = setup_test_app_data().await;
        let instructor = create_test_user(&app_data, UserRole::Instructor, "prof@example.edu", Some("CSE"), None).await;
        let advisor = create_test_user(&app_data, UserRole::FacultyAdvisor, "adv@example.edu", Some("CSE"), Some(3)).await;
        let student = create_test_user(&app_data, UserRole::Student, "stu@example.edu", Some("CSE"), Some(3)).await;
        let api = CourseApi::new(
            Arc::new(CourseCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
        );
        let req = Request::builder().finish();

        let open = api.offer(&req, bearer_for(&app_data, &instructor), offer_body("CS301")).await.unwrap();
        api.offer(&req, bearer_for(&app_data, &instructor), offer_body("CS302")).await.unwrap();
        api.approve(&req, bearer_for(&app_data, &advisor), Path(open.id.clone())).await.unwrap();

        // Even an explicit status filter cannot reveal pending courses to students
        let listed = api
            .list(
                &req,
                bearer_for(&app_data, &student),
                Query(Some(CourseStatusDto::PendingApproval)),
                Query(None),
                Query(None),
            )
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, open.id);
        assert_eq!(listed[0].status, CourseStatusDto::Open);

        let all = api
            .list(&req, bearer_for(&app_data, &advisor), Query(None), Query(None), Query(None))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_student_cannot_offer_course() {
        let (app_data, _sender) = setup_test_app_data().await;
        let student = create_test_user(&app_data, UserRole::Student, "stu@example.edu", Some("CSE"), Some(3)).await;
        let api = CourseApi::new(
            Arc::new(CourseCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
        );
        let req = Request::builder().finish();

        let result = api.offer(&req, bearer_for(&app_data, &student), offer_body("CS301")).await;

        assert!(matches!(result, Err(PortalError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_bad_ltp_is_rejected() {
        let (app_data, _sender) = setup_test_app_data().await;
        let instructor = create_test_user(&app_data, UserRole::Instructor, "prof@example.edu", Some("CSE"), None).await;
        let api = CourseApi::new(
            Arc::new(CourseCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
        );
        let req = Request::builder().finish();
        let mut body = offer_body("CS301");
        body.0.ltp = "3/1/2".to_string();

        let result = api.offer(&req, bearer_for(&app_data, &instructor), body).await;

        assert!(matches!(result, Err(PortalError::BadRequest(_))));
    }
}
