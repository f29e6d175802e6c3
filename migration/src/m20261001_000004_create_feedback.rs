use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Feedback::CourseId).string().not_null())
                    .col(ColumnDef::new(Feedback::Session).string().not_null())
                    .col(ColumnDef::new(Feedback::InstructorId).string().not_null())
                    .col(ColumnDef::new(Feedback::ContentRating).integer().not_null())
                    .col(ColumnDef::new(Feedback::TeachingRating).integer().not_null())
                    .col(ColumnDef::new(Feedback::OverallRating).integer().not_null())
                    .col(ColumnDef::new(Feedback::Comment).string().not_null())
                    .col(ColumnDef::new(Feedback::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_course_id")
                            .from(Feedback::Table, Feedback::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Keyed by (course, session) only: one submission per course and session
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedback_course_session")
                    .table(Feedback::Table)
                    .col(Feedback::CourseId)
                    .col(Feedback::Session)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    CourseId,
    Session,
    InstructorId,
    ContentRating,
    TeachingRating,
    OverallRating,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}
