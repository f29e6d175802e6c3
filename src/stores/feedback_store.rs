use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::FeedbackError;
use crate::types::db::feedback::{self, Entity as Feedback};

/// Data access for anonymous course feedback
pub struct FeedbackStore {}

impl FeedbackStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a submission; the (course, session) unique index rejects a second one
    pub async fn create_feedback(
        &self,
        conn: &impl ConnectionTrait,
        entry: feedback::Model,
    ) -> Result<feedback::Model, InternalError> {
        let course_id = entry.course_id.clone();
        let session = entry.session.clone();
        let active_model = feedback::ActiveModel {
            id: Set(entry.id),
            course_id: Set(entry.course_id),
            session: Set(entry.session),
            instructor_id: Set(entry.instructor_id),
            content_rating: Set(entry.content_rating),
            teaching_rating: Set(entry.teaching_rating),
            overall_rating: Set(entry.overall_rating),
            comment: Set(entry.comment),
            created_at: Set(entry.created_at),
        };

        active_model.insert(conn).await.map_err(|e| {
            let err = InternalError::database("create_feedback", e);
            if err.is_unique_violation() {
                FeedbackError::AlreadySubmitted { course_id, session }.into()
            } else {
                err
            }
        })
    }

    pub async fn exists_for(
        &self,
        conn: &impl ConnectionTrait,
        course_id: &str,
        session: &str,
    ) -> Result<bool, InternalError> {
        let count = Feedback::find()
            .filter(feedback::Column::CourseId.eq(course_id))
            .filter(feedback::Column::Session.eq(session))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_feedback", e))?;

        Ok(count > 0)
    }

    pub async fn list_for_course(
        &self,
        conn: &impl ConnectionTrait,
        course_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        Feedback::find()
            .filter(feedback::Column::CourseId.eq(course_id))
            .order_by_asc(feedback::Column::Session)
            .order_by_asc(feedback::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_feedback_for_course", e))
    }
}

impl Default for FeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}
