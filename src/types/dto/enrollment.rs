use poem_openapi::{Enum, Object};

use crate::types::db::{EnrollmentStatus, enrollment};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatusDto {
    PendingInstructor,
    PendingAdvisor,
    Enrolled,
    Rejected,
}

impl From<EnrollmentStatus> for EnrollmentStatusDto {
    fn from(status: EnrollmentStatus) -> Self {
        match status {
            EnrollmentStatus::PendingInstructor => EnrollmentStatusDto::PendingInstructor,
            EnrollmentStatus::PendingAdvisor => EnrollmentStatusDto::PendingAdvisor,
            EnrollmentStatus::Enrolled => EnrollmentStatusDto::Enrolled,
            EnrollmentStatus::Rejected => EnrollmentStatusDto::Rejected,
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub course_id: String,
}

#[derive(Object, Debug)]
pub struct UpdateRecordRequest {
    pub grade: String,
    pub attendance: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AssignAdvisorRequest {
    pub advisor_id: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub session: String,
    pub faculty_advisor_id: Option<String>,
    pub status: EnrollmentStatusDto,
    pub grade: String,
    pub attendance: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<enrollment::Model> for EnrollmentResponse {
    fn from(e: enrollment::Model) -> Self {
        Self {
            id: e.id,
            student_id: e.student_id,
            course_id: e.course_id,
            session: e.session,
            faculty_advisor_id: e.faculty_advisor_id,
            status: e.status.into(),
            grade: e.grade,
            attendance: e.attendance,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// One course line of a student's transcript
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub enrollment_id: String,
    pub course_id: String,
    pub course_code: String,
    pub title: String,
    pub ltp: String,
    pub status: EnrollmentStatusDto,
    pub grade: String,
    pub attendance: String,
}

#[derive(Object, Debug)]
pub struct TranscriptSession {
    pub session: String,
    pub courses: Vec<TranscriptEntry>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub student_id: String,
    pub sessions: Vec<TranscriptSession>,
}
