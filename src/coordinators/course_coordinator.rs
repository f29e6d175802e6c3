use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CourseError;
use crate::providers::course_lifecycle::{self, CourseOffer, ReviewOutcome};
use crate::stores::{CourseFilter, CourseStore, UserStore};
use crate::types::db::{CourseStatus, UserRole, course};
use crate::types::internal::Decision;
use crate::types::internal::context::RequestContext;

/// Orchestrates course offering, review and listing
pub struct CourseCoordinator {
    app_data: Arc<AppData>,
    course_store: Arc<CourseStore>,
    user_store: Arc<UserStore>,
}

impl CourseCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            course_store: app_data.course_store.clone(),
            user_store: app_data.user_store.clone(),
            app_data,
        }
    }

    /// Instructor offers a course; it starts in `PENDING_APPROVAL`
    pub async fn offer_course(
        &self,
        ctx: &RequestContext,
        offer: CourseOffer,
    ) -> Result<course::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor])?;
        let offer = course_lifecycle::validate_offer(offer)?;
        let now = Utc::now().timestamp();

        let course = self
            .course_store
            .create_course(
                &self.app_data.db,
                course::Model {
                    id: Uuid::new_v4().to_string(),
                    course_code: offer.course_code,
                    title: offer.title,
                    department: offer.department,
                    year: offer.year,
                    ltp: offer.ltp,
                    session: offer.session,
                    instructor_id: claims.sub.clone(),
                    status: CourseStatus::PendingApproval,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            course_id = %course.id,
            course_code = %course.course_code,
            instructor_id = %claims.sub,
            "Course offered"
        );
        Ok(course)
    }

    /// Approve or reject a course offering
    ///
    /// Repeating the decision already applied returns the course unchanged.
    /// The write only lands if the course is still in the status it was read
    /// in, so of two racing opposite decisions exactly one wins.
    pub async fn review_course(
        &self,
        ctx: &RequestContext,
        course_id: &str,
        decision: Decision,
    ) -> Result<course::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::FacultyAdvisor, UserRole::Admin])?;
        let course = self.course_store.require_course(&self.app_data.db, course_id).await?;

        match course_lifecycle::review(course.status, decision)? {
            ReviewOutcome::Unchanged(_) => {
                tracing::debug!(
                    request_id = %ctx.request_id,
                    course_id = %course.id,
                    decision = %decision,
                    "Course review repeated; nothing to change"
                );
                Ok(course)
            }
            ReviewOutcome::Changed(status) => {
                let from = course.status;
                let Some(updated) = self
                    .course_store
                    .update_status(&self.app_data.db, course, from, status)
                    .await?
                else {
                    // Another review landed first; judge this one against it
                    let current = self.course_store.require_course(&self.app_data.db, course_id).await?;
                    return match course_lifecycle::review(current.status, decision)? {
                        ReviewOutcome::Unchanged(_) => Ok(current),
                        ReviewOutcome::Changed(to) => Err(CourseError::InvalidTransition {
                            from: current.status,
                            to,
                        }
                        .into()),
                    };
                };
                tracing::info!(
                    request_id = %ctx.request_id,
                    course_id = %updated.id,
                    reviewer_id = %claims.sub,
                    decision = %decision,
                    "Course reviewed"
                );
                Ok(updated)
            }
        }
    }

    /// Course catalogue; students only ever see `OPEN` courses
    pub async fn list_courses(
        &self,
        ctx: &RequestContext,
        mut filter: CourseFilter,
    ) -> Result<Vec<course::Model>, InternalError> {
        let claims = ctx.require_claims()?;
        if claims.role == UserRole::Student {
            filter.status = Some(CourseStatus::Open);
        }
        filter.instructor_id = None;

        self.course_store.list_courses(&self.app_data.db, filter).await
    }

    pub async fn my_courses(&self, ctx: &RequestContext) -> Result<Vec<course::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor])?;

        self.course_store
            .list_courses(
                &self.app_data.db,
                CourseFilter {
                    instructor_id: Some(claims.sub.clone()),
                    ..CourseFilter::default()
                },
            )
            .await
    }

    /// Courses awaiting review; advisors see those of their own department
    pub async fn pending_courses(&self, ctx: &RequestContext) -> Result<Vec<course::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::FacultyAdvisor, UserRole::Admin])?;

        let department = match claims.role {
            UserRole::FacultyAdvisor => {
                let advisor = self.user_store.require_user(&self.app_data.db, &claims.sub).await?;
                advisor.department
            }
            _ => None,
        };

        self.course_store
            .list_courses(
                &self.app_data.db,
                CourseFilter {
                    status: Some(CourseStatus::PendingApproval),
                    department,
                    ..CourseFilter::default()
                },
            )
            .await
    }
}
