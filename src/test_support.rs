use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::entities::{plan_entity as plans, user_entity as users};
use crate::models::Principal;

/// Fresh in-memory database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    // a single connection keeps the in-memory database alive and shared
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn create_user(db: &DatabaseConnection, email: &str) -> Principal {
    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert user");
    Principal::new(user.id)
}

/// The shortest seeded plan (monthly).
pub async fn first_plan(db: &DatabaseConnection) -> plans::Model {
    plans::Entity::find()
        .order_by_asc(plans::Column::DurationMonths)
        .one(db)
        .await
        .expect("query plans")
        .expect("seeded plan")
}

pub fn app_config() -> AppConfig {
    AppConfig {
        public_base_url: "https://cards.example.com".to_string(),
        ..AppConfig::default()
    }
}
