use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::CourseError;
use crate::types::db::CourseStatus;
use crate::types::db::course::{self, Entity as Course};

/// Optional filters for course listings; `None` means "any"
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub status: Option<CourseStatus>,
    pub session: Option<String>,
    pub department: Option<String>,
    pub instructor_id: Option<String>,
}

/// Data access for course offerings
pub struct CourseStore {}

impl CourseStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn create_course(
        &self,
        conn: &impl ConnectionTrait,
        new_course: course::Model,
    ) -> Result<course::Model, InternalError> {
        let active_model = course::ActiveModel {
            id: Set(new_course.id),
            course_code: Set(new_course.course_code),
            title: Set(new_course.title),
            department: Set(new_course.department),
            year: Set(new_course.year),
            ltp: Set(new_course.ltp),
            session: Set(new_course.session),
            instructor_id: Set(new_course.instructor_id),
            status: Set(new_course.status),
            created_at: Set(new_course.created_at),
            updated_at: Set(new_course.updated_at),
        };

        active_model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_course", e))
    }

    pub async fn get_course(
        &self,
        conn: &impl ConnectionTrait,
        course_id: &str,
    ) -> Result<Option<course::Model>, InternalError> {
        Course::find_by_id(course_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_course", e))
    }

    pub async fn require_course(
        &self,
        conn: &impl ConnectionTrait,
        course_id: &str,
    ) -> Result<course::Model, InternalError> {
        self.get_course(conn, course_id).await?.ok_or_else(|| {
            CourseError::CourseNotFound {
                course_id: course_id.to_string(),
            }
            .into()
        })
    }

    pub async fn list_courses(
        &self,
        conn: &impl ConnectionTrait,
        filter: CourseFilter,
    ) -> Result<Vec<course::Model>, InternalError> {
        let mut query = Course::find();
        if let Some(status) = filter.status {
            query = query.filter(course::Column::Status.eq(status));
        }
        if let Some(session) = filter.session {
            query = query.filter(course::Column::Session.eq(session));
        }
        if let Some(department) = filter.department {
            query = query.filter(course::Column::Department.eq(department));
        }
        if let Some(instructor_id) = filter.instructor_id {
            query = query.filter(course::Column::InstructorId.eq(instructor_id));
        }

        query
            .order_by_asc(course::Column::Session)
            .order_by_asc(course::Column::CourseCode)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_courses", e))
    }

    /// Move a course from `from` to `to` in one conditional UPDATE
    ///
    /// Returns `None` when another review changed the status first.
    pub async fn update_status(
        &self,
        conn: &impl ConnectionTrait,
        existing: course::Model,
        from: CourseStatus,
        to: CourseStatus,
    ) -> Result<Option<course::Model>, InternalError> {
        let now = Utc::now().timestamp();

        let result = Course::update_many()
            .col_expr(course::Column::Status, Expr::value(to))
            .col_expr(course::Column::UpdatedAt, Expr::value(now))
            .filter(course::Column::Id.eq(existing.id.as_str()))
            .filter(course::Column::Status.eq(from))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("update_course_status", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(course::Model {
            status: to,
            updated_at: now,
            ..existing
        }))
    }
}

impl Default for CourseStore {
    fn default() -> Self {
        Self::new()
    }
}
