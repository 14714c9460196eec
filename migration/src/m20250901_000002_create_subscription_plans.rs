use chrono::Utc;
use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveIden)]
pub(crate) enum SubscriptionPlans {
    Table,
    Id,
    Name,
    DurationMonths,
    PriceCents,
    StripePriceId,
    CreatedAt,
}

// (name, duration in months, price in minor units)
const DEFAULT_PLANS: [(&str, i32, i64); 4] = [
    ("Monthly", 1, 29_900),
    ("Quarterly", 3, 79_900),
    ("Half-Yearly", 6, 149_900),
    ("Yearly", 12, 279_900),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::DurationMonths)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::StripePriceId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(SubscriptionPlans::Table).columns([
            SubscriptionPlans::Id,
            SubscriptionPlans::Name,
            SubscriptionPlans::DurationMonths,
            SubscriptionPlans::PriceCents,
            SubscriptionPlans::CreatedAt,
        ]);
        for (name, months, price) in DEFAULT_PLANS {
            insert.values_panic([
                Uuid::new_v4().into(),
                name.into(),
                months.into(),
                price.into(),
                Utc::now().into(),
            ]);
        }
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SubscriptionPlans::Table)
                    .to_owned(),
            )
            .await
    }
}
