use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;

#[derive(DeriveIden)]
enum UserTemplatePayments {
    Table,
    Id,
    UserId,
    TemplateId,
    PlanId,
    PaymentStatus,
    PaymentDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserTemplatePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserTemplatePayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserTemplatePayments::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserTemplatePayments::TemplateId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserTemplatePayments::PlanId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserTemplatePayments::PaymentStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTemplatePayments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTemplatePayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTemplatePayments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_template_payments_user")
                            .from(UserTemplatePayments::Table, UserTemplatePayments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_template_payments_user_template")
                    .table(UserTemplatePayments::Table)
                    .col(UserTemplatePayments::UserId)
                    .col(UserTemplatePayments::TemplateId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(UserTemplatePayments::Table)
                    .to_owned(),
            )
            .await
    }
}
