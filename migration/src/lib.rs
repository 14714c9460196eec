pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_subscription_plans;
mod m20250901_000003_create_user_subscriptions;
mod m20250902_000001_create_digital_cards;
mod m20250902_000002_create_card_analytics;
mod m20250905_000001_create_user_template_payments;
mod m20250910_000001_create_payment_confirmations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_subscription_plans::Migration),
            Box::new(m20250901_000003_create_user_subscriptions::Migration),
            Box::new(m20250902_000001_create_digital_cards::Migration),
            Box::new(m20250902_000002_create_card_analytics::Migration),
            Box::new(m20250905_000001_create_user_template_payments::Migration),
            Box::new(m20250910_000001_create_payment_confirmations::Migration),
        ]
    }
}
