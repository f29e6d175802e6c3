use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::app_data::AppData;
use crate::coordinators::ensure_course_access;
use crate::errors::InternalError;
use crate::errors::internal::{AccessError, CourseError, EnrollmentError};
use crate::providers::enrollment_workflow::{self, ApprovalStage};
use crate::stores::{CourseStore, EnrollmentStore, UserStore};
use crate::types::db::enrollment::{self, UNRECORDED};
use crate::types::db::{CourseStatus, EnrollmentStatus, UserRole};
use crate::types::dto::enrollment::{TranscriptEntry, TranscriptResponse, TranscriptSession};
use crate::types::internal::Decision;
use crate::types::internal::context::RequestContext;

/// Orchestrates the enrollment approval pipeline
pub struct EnrollmentCoordinator {
    app_data: Arc<AppData>,
    enrollment_store: Arc<EnrollmentStore>,
    course_store: Arc<CourseStore>,
    user_store: Arc<UserStore>,
}

impl EnrollmentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            enrollment_store: app_data.enrollment_store.clone(),
            course_store: app_data.course_store.clone(),
            user_store: app_data.user_store.clone(),
            app_data,
        }
    }

    /// Student requests enrollment in an open course
    ///
    /// Coordinates, inside one transaction:
    /// 1. Load the student and the course (must be `OPEN`)
    /// 2. Refuse a second request for the same course and session
    /// 3. Resolve the faculty advisor for the student's department and year
    /// 4. Create the record in `PENDING_INSTRUCTOR`
    pub async fn request_enrollment(
        &self,
        ctx: &RequestContext,
        course_id: &str,
    ) -> Result<enrollment::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Student])?;
        let txn = self
            .app_data
            .db
            .begin()
            .await
            .map_err(InternalError::transaction_begin)?;

        // Step 1: Load student and course
        let student = self.user_store.require_user(&txn, &claims.sub).await?;
        let course = self.course_store.require_course(&txn, course_id).await?;
        if course.status != CourseStatus::Open {
            return Err(CourseError::NotOpen {
                course_id: course.id,
            }
            .into());
        }

        // Step 2: Duplicate check; the unique index still catches a race
        if self
            .enrollment_store
            .find_for_student(&txn, &student.id, &course.id, &course.session)
            .await?
            .is_some()
        {
            return Err(EnrollmentError::DuplicateRequest {
                course_id: course.id,
                session: course.session,
            }
            .into());
        }

        // Step 3: Advisor lookup
        let advisor = match (student.department.as_deref(), student.year) {
            (Some(department), Some(year)) => self.user_store.find_advisor(&txn, department, year).await?,
            _ => None,
        };
        if advisor.is_none() {
            tracing::warn!(
                request_id = %ctx.request_id,
                student_id = %student.id,
                department = ?student.department,
                year = ?student.year,
                "No faculty advisor found; enrollment will await admin assignment"
            );
        }

        // Step 4: Create the record
        let now = Utc::now().timestamp();
        let created = self
            .enrollment_store
            .create_enrollment(
                &txn,
                enrollment::Model {
                    id: Uuid::new_v4().to_string(),
                    student_id: student.id,
                    course_id: course.id,
                    session: course.session,
                    faculty_advisor_id: advisor.map(|a| a.id),
                    status: EnrollmentStatus::PendingInstructor,
                    grade: UNRECORDED.to_string(),
                    attendance: UNRECORDED.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            )
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(
            request_id = %ctx.request_id,
            enrollment_id = %created.id,
            course_id = %created.course_id,
            "Enrollment requested"
        );
        Ok(created)
    }

    /// Apply an instructor or advisor decision
    ///
    /// The instructor must teach the course; the advisor must be the one
    /// stored on the record. Ownership is checked before the transition, and
    /// the status write only lands if the record is still waiting on `stage`.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        enrollment_id: &str,
        stage: ApprovalStage,
        decision: Decision,
    ) -> Result<enrollment::Model, InternalError> {
        let role = match stage {
            ApprovalStage::Instructor => UserRole::Instructor,
            ApprovalStage::Advisor => UserRole::FacultyAdvisor,
        };
        let claims = ctx.require_role(&[role])?;
        let db = &self.app_data.db;

        let enrollment = self.enrollment_store.require_enrollment(db, enrollment_id).await?;

        match stage {
            ApprovalStage::Instructor => {
                let course = self.course_store.require_course(db, &enrollment.course_id).await?;
                if course.instructor_id != claims.sub {
                    return Err(AccessError::NotCourseInstructor {
                        course_id: course.id,
                    }
                    .into());
                }
            }
            ApprovalStage::Advisor => {
                if enrollment.faculty_advisor_id.as_deref() != Some(claims.sub.as_str()) {
                    return Err(AccessError::NotAssignedAdvisor {
                        enrollment_id: enrollment.id,
                    }
                    .into());
                }
            }
        }

        let from = enrollment.status;
        let next = enrollment_workflow::transition(from, stage, decision)?;

        // Conditional write: a decision that raced ahead of this one wins
        let Some(updated) = self
            .enrollment_store
            .update_status(db, enrollment, stage.pending_status(), next)
            .await?
        else {
            let current = self.enrollment_store.require_enrollment(db, enrollment_id).await?;
            return Err(EnrollmentError::InvalidTransition {
                from: current.status,
                stage: stage.as_str(),
            }
            .into());
        };

        tracing::info!(
            request_id = %ctx.request_id,
            enrollment_id = %updated.id,
            stage = stage.as_str(),
            decision = %decision,
            from = %from,
            to = %next,
            "Enrollment decided"
        );
        Ok(updated)
    }

    /// Instructor records grade and attendance, stored exactly as given
    pub async fn update_record(
        &self,
        ctx: &RequestContext,
        enrollment_id: &str,
        grade: String,
        attendance: String,
    ) -> Result<enrollment::Model, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor])?;
        let db = &self.app_data.db;

        let enrollment = self.enrollment_store.require_enrollment(db, enrollment_id).await?;
        let course = self.course_store.require_course(db, &enrollment.course_id).await?;
        if course.instructor_id != claims.sub {
            return Err(AccessError::NotCourseInstructor {
                course_id: course.id,
            }
            .into());
        }

        enrollment_workflow::ensure_recordable(enrollment.status)?;
        enrollment_workflow::validate_record_value("grade", &grade)?;
        enrollment_workflow::validate_record_value("attendance", &attendance)?;

        let updated = self
            .enrollment_store
            .set_record(db, enrollment, grade, attendance)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            enrollment_id = %updated.id,
            "Enrollment record updated"
        );
        Ok(updated)
    }

    /// The calling student's enrollments grouped by session, oldest session first
    pub async fn transcript(&self, ctx: &RequestContext) -> Result<TranscriptResponse, InternalError> {
        let claims = ctx.require_role(&[UserRole::Student])?;
        let rows = self
            .enrollment_store
            .list_for_student_with_courses(&self.app_data.db, &claims.sub)
            .await?;

        let mut sessions: BTreeMap<String, Vec<TranscriptEntry>> = BTreeMap::new();
        for (enrollment, course) in rows {
            // Cascade delete keeps this from happening; skip rather than fail
            let Some(course) = course else {
                tracing::warn!(enrollment_id = %enrollment.id, "Enrollment without course skipped");
                continue;
            };
            sessions
                .entry(enrollment.session)
                .or_default()
                .push(TranscriptEntry {
                    enrollment_id: enrollment.id,
                    course_id: course.id,
                    course_code: course.course_code,
                    title: course.title,
                    ltp: course.ltp,
                    status: enrollment.status.into(),
                    grade: enrollment.grade,
                    attendance: enrollment.attendance,
                });
        }

        Ok(TranscriptResponse {
            student_id: claims.sub.clone(),
            sessions: sessions
                .into_iter()
                .map(|(session, courses)| TranscriptSession { session, courses })
                .collect(),
        })
    }

    /// Requests waiting on the calling instructor
    pub async fn instructor_pending(&self, ctx: &RequestContext) -> Result<Vec<enrollment::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor])?;

        self.enrollment_store
            .list_for_instructor(&self.app_data.db, &claims.sub, EnrollmentStatus::PendingInstructor)
            .await
    }

    /// Requests waiting on the calling advisor
    pub async fn advisor_pending(&self, ctx: &RequestContext) -> Result<Vec<enrollment::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::FacultyAdvisor])?;

        self.enrollment_store
            .list_for_advisor(&self.app_data.db, &claims.sub, EnrollmentStatus::PendingAdvisor)
            .await
    }

    /// All enrollments of a course; owning instructor or admin
    pub async fn course_roster(
        &self,
        ctx: &RequestContext,
        course_id: &str,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        let claims = ctx.require_role(&[UserRole::Instructor, UserRole::Admin])?;
        let course = self.course_store.require_course(&self.app_data.db, course_id).await?;
        ensure_course_access(claims, &course)?;

        self.enrollment_store.list_for_course(&self.app_data.db, &course.id).await
    }
}
