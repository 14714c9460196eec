use sea_orm_migration::prelude::*;

use crate::m20250902_000001_create_digital_cards::DigitalCards;

#[derive(DeriveIden)]
enum CardAnalytics {
    Table,
    Id,
    CardId,
    ViewerIp,
    UserAgent,
    Referrer,
    ViewedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardAnalytics::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardAnalytics::CardId).uuid().not_null())
                    .col(ColumnDef::new(CardAnalytics::ViewerIp).string_len(64).null())
                    .col(ColumnDef::new(CardAnalytics::UserAgent).text().null())
                    .col(ColumnDef::new(CardAnalytics::Referrer).text().null())
                    .col(
                        ColumnDef::new(CardAnalytics::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_analytics_card")
                            .from(CardAnalytics::Table, CardAnalytics::CardId)
                            .to(DigitalCards::Table, DigitalCards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_card_analytics_card")
                    .table(CardAnalytics::Table)
                    .col(CardAnalytics::CardId)
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
                    .table(CardAnalytics::Table)
                    .to_owned(),
            )
            .await
    }
}
