use poem_openapi::{Enum, Object};

use crate::types::db::{CourseStatus, course};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatusDto {
    PendingApproval,
    Open,
    Rejected,
}

impl From<CourseStatus> for CourseStatusDto {
    fn from(status: CourseStatus) -> Self {
        match status {
            CourseStatus::PendingApproval => CourseStatusDto::PendingApproval,
            CourseStatus::Open => CourseStatusDto::Open,
            CourseStatus::Rejected => CourseStatusDto::Rejected,
        }
    }
}

impl From<CourseStatusDto> for CourseStatus {
    fn from(status: CourseStatusDto) -> Self {
        match status {
            CourseStatusDto::PendingApproval => CourseStatus::PendingApproval,
            CourseStatusDto::Open => CourseStatus::Open,
            CourseStatusDto::Rejected => CourseStatus::Rejected,
        }
    }
}

/// Instructor's course offering
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct OfferCourseRequest {
    pub course_code: String,
    pub title: String,
    pub department: String,
    pub year: i32,
    /// Lecture-Tutorial-Practical structure, e.g. "3-1-2"
    pub ltp: String,
    pub session: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub course_code: String,
    pub title: String,
    pub department: String,
    pub year: i32,
    pub ltp: String,
    pub session: String,
    pub instructor_id: String,
    pub status: CourseStatusDto,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<course::Model> for CourseResponse {
    fn from(c: course::Model) -> Self {
        Self {
            id: c.id,
            course_code: c.course_code,
            title: c.title,
            department: c.department,
            year: c.year,
            ltp: c.ltp,
            session: c.session,
            instructor_id: c.instructor_id,
            status: c.status.into(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
