use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Placeholder stored in grade and attendance until the instructor records them
pub const UNRECORDED: &str = "-";

/// Stage of an enrollment in the approval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "PENDING_INSTRUCTOR")]
    PendingInstructor,
    #[sea_orm(string_value = "PENDING_ADVISOR")]
    PendingAdvisor,
    #[sea_orm(string_value = "ENROLLED")]
    Enrolled,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl EnrollmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EnrollmentStatus::Enrolled | EnrollmentStatus::Rejected)
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrollmentStatus::PendingInstructor => "PENDING_INSTRUCTOR",
            EnrollmentStatus::PendingAdvisor => "PENDING_ADVISOR",
            EnrollmentStatus::Enrolled => "ENROLLED",
            EnrollmentStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub session: String,
    /// None when no advisor matched the student's department and year
    pub faculty_advisor_id: Option<String>,
    pub status: EnrollmentStatus,
    pub grade: String,
    pub attendance: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
