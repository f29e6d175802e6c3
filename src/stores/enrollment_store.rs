use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::EnrollmentError;
use crate::types::db::EnrollmentStatus;
use crate::types::db::course;
use crate::types::db::enrollment::{self, Entity as Enrollment};

/// Data access for the enrollment ledger
pub struct EnrollmentStore {}

impl EnrollmentStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a new enrollment
    ///
    /// The (student, course, session) unique index turns a racing duplicate
    /// into `EnrollmentError::DuplicateRequest`.
    pub async fn create_enrollment(
        &self,
        conn: &impl ConnectionTrait,
        new_enrollment: enrollment::Model,
    ) -> Result<enrollment::Model, InternalError> {
        let course_id = new_enrollment.course_id.clone();
        let session = new_enrollment.session.clone();
        let active_model = enrollment::ActiveModel {
            id: Set(new_enrollment.id),
            student_id: Set(new_enrollment.student_id),
            course_id: Set(new_enrollment.course_id),
            session: Set(new_enrollment.session),
            faculty_advisor_id: Set(new_enrollment.faculty_advisor_id),
            status: Set(new_enrollment.status),
            grade: Set(new_enrollment.grade),
            attendance: Set(new_enrollment.attendance),
            created_at: Set(new_enrollment.created_at),
            updated_at: Set(new_enrollment.updated_at),
        };

        active_model.insert(conn).await.map_err(|e| {
            let err = InternalError::database("create_enrollment", e);
            if err.is_unique_violation() {
                EnrollmentError::DuplicateRequest { course_id, session }.into()
            } else {
                err
            }
        })
    }

    pub async fn get_enrollment(
        &self,
        conn: &impl ConnectionTrait,
        enrollment_id: &str,
    ) -> Result<Option<enrollment::Model>, InternalError> {
        Enrollment::find_by_id(enrollment_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_enrollment", e))
    }

    pub async fn require_enrollment(
        &self,
        conn: &impl ConnectionTrait,
        enrollment_id: &str,
    ) -> Result<enrollment::Model, InternalError> {
        self.get_enrollment(conn, enrollment_id).await?.ok_or_else(|| {
            EnrollmentError::EnrollmentNotFound {
                enrollment_id: enrollment_id.to_string(),
            }
            .into()
        })
    }

    pub async fn find_for_student(
        &self,
        conn: &impl ConnectionTrait,
        student_id: &str,
        course_id: &str,
        session: &str,
    ) -> Result<Option<enrollment::Model>, InternalError> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(enrollment::Column::Session.eq(session))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_enrollment_for_student", e))
    }

    /// Move an enrollment from `from` to `to` in one conditional UPDATE
    ///
    /// Returns `None` when the stored status is no longer `from`, meaning a
    /// concurrent decision got there first; nothing is written in that case.
    pub async fn update_status(
        &self,
        conn: &impl ConnectionTrait,
        existing: enrollment::Model,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<Option<enrollment::Model>, InternalError> {
        let now = Utc::now().timestamp();

        let result = Enrollment::update_many()
            .col_expr(enrollment::Column::Status, Expr::value(to))
            .col_expr(enrollment::Column::UpdatedAt, Expr::value(now))
            .filter(enrollment::Column::Id.eq(existing.id.as_str()))
            .filter(enrollment::Column::Status.eq(from))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("update_enrollment_status", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(enrollment::Model {
            status: to,
            updated_at: now,
            ..existing
        }))
    }

    /// Write grade and attendance exactly as given
    pub async fn set_record(
        &self,
        conn: &impl ConnectionTrait,
        existing: enrollment::Model,
        grade: String,
        attendance: String,
    ) -> Result<enrollment::Model, InternalError> {
        let mut active_model = existing.into_active_model();
        active_model.grade = Set(grade);
        active_model.attendance = Set(attendance);
        active_model.updated_at = Set(Utc::now().timestamp());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_enrollment_record", e))
    }

    pub async fn set_advisor(
        &self,
        conn: &impl ConnectionTrait,
        existing: enrollment::Model,
        advisor_id: String,
    ) -> Result<enrollment::Model, InternalError> {
        let mut active_model = existing.into_active_model();
        active_model.faculty_advisor_id = Set(Some(advisor_id));
        active_model.updated_at = Set(Utc::now().timestamp());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_enrollment_advisor", e))
    }

    /// A student's enrollments with their courses, ordered by session then course code
    pub async fn list_for_student_with_courses(
        &self,
        conn: &impl ConnectionTrait,
        student_id: &str,
    ) -> Result<Vec<(enrollment::Model, Option<course::Model>)>, InternalError> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .find_also_related(course::Entity)
            .order_by_asc(enrollment::Column::Session)
            .order_by_asc(course::Column::CourseCode)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_for_student", e))
    }

    /// Enrollments in a given status across all courses taught by an instructor
    pub async fn list_for_instructor(
        &self,
        conn: &impl ConnectionTrait,
        instructor_id: &str,
        status: EnrollmentStatus,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        Enrollment::find()
            .join(JoinType::InnerJoin, enrollment::Relation::Course.def())
            .filter(course::Column::InstructorId.eq(instructor_id))
            .filter(enrollment::Column::Status.eq(status))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_for_instructor", e))
    }

    pub async fn list_for_advisor(
        &self,
        conn: &impl ConnectionTrait,
        advisor_id: &str,
        status: EnrollmentStatus,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        Enrollment::find()
            .filter(enrollment::Column::FacultyAdvisorId.eq(advisor_id))
            .filter(enrollment::Column::Status.eq(status))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_for_advisor", e))
    }

    pub async fn list_for_course(
        &self,
        conn: &impl ConnectionTrait,
        course_id: &str,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        Enrollment::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_enrollments_for_course", e))
    }

    /// Pending enrollments without an advisor; decided records are left out
    pub async fn list_unassigned(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<enrollment::Model>, InternalError> {
        Enrollment::find()
            .filter(enrollment::Column::FacultyAdvisorId.is_null())
            .filter(enrollment::Column::Status.is_in([
                EnrollmentStatus::PendingInstructor,
                EnrollmentStatus::PendingAdvisor,
            ]))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_unassigned_enrollments", e))
    }

    /// Detach an advisor from every enrollment still waiting in the pipeline
    ///
    /// The records show up in `list_unassigned` afterwards. Returns the number
    /// of records released.
    pub async fn release_advisor(
        &self,
        conn: &impl ConnectionTrait,
        advisor_id: &str,
    ) -> Result<u64, InternalError> {
        let result = Enrollment::update_many()
            .col_expr(enrollment::Column::FacultyAdvisorId, Expr::value(Option::<String>::None))
            .col_expr(enrollment::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(enrollment::Column::FacultyAdvisorId.eq(advisor_id))
            .filter(enrollment::Column::Status.is_in([
                EnrollmentStatus::PendingInstructor,
                EnrollmentStatus::PendingAdvisor,
            ]))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("release_enrollment_advisor", e))?;

        Ok(result.rows_affected)
    }
}

impl Default for EnrollmentStore {
    fn default() -> Self {
        Self::new()
    }
}
