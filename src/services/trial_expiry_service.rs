use crate::entities::{
    SubscriptionStatus, card_entity as cards, subscription_entity as subscriptions,
};
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

/// Takes the public cards of lapsed trial users offline.
#[derive(Clone)]
pub struct TrialExpiryService {
    pool: DatabaseConnection,
}

impl TrialExpiryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Hides every public card owned by a user whose trial ended before
    /// `now` and returns how many cards changed. Only ever flips
    /// `is_public` from true to false, so re-running is harmless.
    pub async fn expire_trial_cards(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let user_ids: Vec<Uuid> = subscriptions::Entity::find()
            .select_only()
            .column(subscriptions::Column::UserId)
            .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Trial))
            .filter(subscriptions::Column::TrialEnd.lt(now))
            .into_tuple()
            .all(&self.pool)
            .await?;

        if user_ids.is_empty() {
            return Ok(0);
        }
        let user_count = user_ids.len();

        let result = cards::Entity::update_many()
            .col_expr(cards::Column::IsPublic, Expr::value(false))
            .col_expr(cards::Column::UpdatedAt, Expr::value(now))
            .filter(cards::Column::UserId.is_in(user_ids))
            .filter(cards::Column::IsPublic.eq(true))
            .exec(&self.pool)
            .await?;

        log::debug!(
            "Hid {} card(s) of {} lapsed trial user(s)",
            result.rows_affected,
            user_count
        );
        Ok(result.rows_affected)
    }
}
