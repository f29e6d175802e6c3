use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Settings seeded on first migration: (key, value, description, category)
const SEEDED_SETTINGS: [(&str, &str, &str, &str); 2] = [
    (
        "feedback_active",
        "false",
        "Whether students may currently submit course feedback",
        "feedback",
    ),
    (
        "feedback_session",
        "",
        "Academic session for which feedback is being collected",
        "feedback",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemSettings::Value).string().not_null())
                    .col(ColumnDef::new(SystemSettings::Description).string().null())
                    .col(ColumnDef::new(SystemSettings::Category).string().null())
                    .col(ColumnDef::new(SystemSettings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(SystemSettings::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_system_settings_category")
                    .table(SystemSettings::Table)
                    .col(SystemSettings::Category)
                    .to_owned(),
            )
            .await?;

        // Initial timestamp, bumped when a setting is modified
        let now = 0i64;

        for (key, value, description, category) in SEEDED_SETTINGS {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(SystemSettings::Table)
                        .columns([
                            SystemSettings::Key,
                            SystemSettings::Value,
                            SystemSettings::Description,
                            SystemSettings::Category,
                            SystemSettings::CreatedAt,
                            SystemSettings::UpdatedAt,
                        ])
                        .values_panic([
                            key.into(),
                            value.into(),
                            description.into(),
                            category.into(),
                            now.into(),
                            now.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SystemSettings {
    Table,
    Key,
    Value,
    Description,
    Category,
    CreatedAt,
    UpdatedAt,
}
