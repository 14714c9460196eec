use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_users::Users;

#[derive(DeriveIden)]
pub(crate) enum DigitalCards {
    Table,
    Id,
    UserId,
    Name,
    Title,
    Company,
    Email,
    Phone,
    Website,
    Bio,
    ProfileImage,
    Social,
    Colors,
    Template,
    Slug,
    IsPublic,
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
                    .table(DigitalCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DigitalCards::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DigitalCards::UserId).uuid().null())
                    .col(ColumnDef::new(DigitalCards::Name).string_len(255).not_null())
                    .col(ColumnDef::new(DigitalCards::Title).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Company).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Email).string_len(255).null())
                    .col(ColumnDef::new(DigitalCards::Phone).string_len(64).null())
                    .col(ColumnDef::new(DigitalCards::Website).text().null())
                    .col(ColumnDef::new(DigitalCards::Bio).text().null())
                    .col(ColumnDef::new(DigitalCards::ProfileImage).text().null())
                    .col(ColumnDef::new(DigitalCards::Social).json_binary().not_null())
                    .col(ColumnDef::new(DigitalCards::Colors).json_binary().not_null())
                    .col(
                        ColumnDef::new(DigitalCards::Template)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DigitalCards::Slug).string_len(255).not_null())
                    .col(
                        ColumnDef::new(DigitalCards::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DigitalCards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_digital_cards_user")
                            .from(DigitalCards::Table, DigitalCards::UserId)
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
                    .name("idx_digital_cards_slug")
                    .table(DigitalCards::Table)
                    .col(DigitalCards::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_digital_cards_user")
                    .table(DigitalCards::Table)
                    .col(DigitalCards::UserId)
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
                    .table(DigitalCards::Table)
                    .to_owned(),
            )
            .await
    }
}
