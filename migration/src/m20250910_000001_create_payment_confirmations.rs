use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;

#[derive(DeriveIden)]
enum PaymentConfirmations {
    Table,
    Id,
    UserId,
    StripePaymentIntentId,
    PlanId,
    TemplateId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentConfirmations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentConfirmations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentConfirmations::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentConfirmations::StripePaymentIntentId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentConfirmations::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PaymentConfirmations::TemplateId).string_len(64).null())
                    .col(
                        ColumnDef::new(PaymentConfirmations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_confirmations_user")
                            .from(PaymentConfirmations::Table, PaymentConfirmations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one row per consumed intent
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payment_confirmations_intent")
                    .table(PaymentConfirmations::Table)
                    .col(PaymentConfirmations::StripePaymentIntentId)
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
                    .table(PaymentConfirmations::Table)
                    .to_owned(),
            )
            .await
    }
}
