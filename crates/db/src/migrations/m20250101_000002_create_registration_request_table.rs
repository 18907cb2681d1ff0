//! Create registration request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RegistrationRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RegistrationRequest::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(RegistrationRequest::Email).string_len(320).not_null())
                    .col(ColumnDef::new(RegistrationRequest::PhoneNumber).string_len(32).not_null())
                    .col(ColumnDef::new(RegistrationRequest::About).text().not_null())
                    .col(ColumnDef::new(RegistrationRequest::ConsentGiven).boolean().not_null())
                    .col(
                        ColumnDef::new(RegistrationRequest::RequestedRole)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationRequest::PassportNumber).string_len(64))
                    .col(ColumnDef::new(RegistrationRequest::PassportIssuedBy).string_len(256))
                    .col(ColumnDef::new(RegistrationRequest::PassportIssueDate).date())
                    .col(
                        ColumnDef::new(RegistrationRequest::DirectorApprovalLetterUrl)
                            .string_len(1024),
                    )
                    .col(
                        ColumnDef::new(RegistrationRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(RegistrationRequest::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(RegistrationRequest::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(RegistrationRequest::RejectionReason).text())
                    .col(ColumnDef::new(RegistrationRequest::UserId).string_len(32))
                    .col(
                        ColumnDef::new(RegistrationRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(RegistrationRequest::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (status, created_at) for the admin listing
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_request_status_created_at")
                    .table(RegistrationRequest::Table)
                    .col(RegistrationRequest::Status)
                    .col(RegistrationRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (email, status) for the duplicate-submission check
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_request_email_status")
                    .table(RegistrationRequest::Table)
                    .col(RegistrationRequest::Email)
                    .col(RegistrationRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegistrationRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RegistrationRequest {
    Table,
    Id,
    FullName,
    Email,
    PhoneNumber,
    About,
    ConsentGiven,
    RequestedRole,
    PassportNumber,
    PassportIssuedBy,
    PassportIssueDate,
    DirectorApprovalLetterUrl,
    Status,
    ReviewedBy,
    ReviewedAt,
    RejectionReason,
    UserId,
    CreatedAt,
    UpdatedAt,
}
