use sea_orm::entity::prelude::*;

/// Anonymous course feedback; no student reference is stored
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
