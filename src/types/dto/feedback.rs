use poem_openapi::Object;

use crate::types::db::feedback;

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub course_id: String,
    pub content_rating: i32,
    pub teaching_rating: i32,
    pub overall_rating: i32,
    #[oai(default)]
    pub comment: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub course_id: String,
    pub session: String,
    pub instructor_id: String,
    pub content_rating: i32,
    pub teaching_rating: i32,
    pub overall_rating: i32,
    pub comment: String,
    pub created_at: i64,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(f: feedback::Model) -> Self {
        Self {
            id: f.id,
            course_id: f.course_id,
            session: f.session,
            instructor_id: f.instructor_id,
            content_rating: f.content_rating,
            teaching_rating: f.teaching_rating,
            overall_rating: f.overall_rating,
            comment: f.comment,
            created_at: f.created_at,
        }
    }
}

/// Current state of the feedback gate; also the admin update body
#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct FeedbackSettings {
    pub feedback_active: bool,
    pub feedback_session: String,
}
