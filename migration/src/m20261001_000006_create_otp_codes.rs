use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpCodes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OtpCodes::Email).string().not_null().primary_key())
                    .col(ColumnDef::new(OtpCodes::CodeHash).string().not_null())
                    .col(ColumnDef::new(OtpCodes::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(OtpCodes::Attempts).integer().not_null().default(0))
                    .col(ColumnDef::new(OtpCodes::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_otp_codes_expires_at")
                    .table(OtpCodes::Table)
                    .col(OtpCodes::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OtpCodes {
    Table,
    Email,
    CodeHash,
    ExpiresAt,
    Attempts,
    CreatedAt,
}
