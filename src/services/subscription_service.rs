use std::collections::HashMap;

use crate::entities::{
    SubscriptionStatus, payment_confirmation_entity as payment_confirmations,
    plan_entity as plans, subscription_entity as subscriptions,
    template_payment_entity as template_payments,
};
use crate::error::{AppError, AppResult};
use crate::external::{META_PLAN_ID, META_TEMPLATE_ID, META_USER_ID, StripeService};
use crate::models::*;
use crate::services::entitlement;
use crate::services::template_service::find_template;
use chrono::{DateTime, Duration, Months, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use stripe::PaymentIntentStatus;
use uuid::Uuid;

const TEMPLATE_PAYMENT_ACTIVE: &str = "active";

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
    trial_days: i64,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection, stripe_service: StripeService, trial_days: i64) -> Self {
        Self {
            pool,
            stripe_service,
            trial_days,
        }
    }

    pub async fn list_plans(&self) -> AppResult<Vec<PlanResponse>> {
        let plans = plans::Entity::find()
            .order_by_asc(plans::Column::DurationMonths)
            .all(&self.pool)
            .await?;
        Ok(plans.into_iter().map(PlanResponse::from).collect())
    }

    /// An unknown plan is a malformed reference from the caller.
    pub async fn find_plan(&self, plan_id: Uuid) -> AppResult<plans::Model> {
        plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Unknown subscription plan".to_string()))
    }

    pub async fn get_subscription(&self, user_id: Uuid) -> AppResult<Option<subscriptions::Model>> {
        Ok(subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?)
    }

    pub async fn entitlement_for(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Entitlement> {
        let subscription = self.get_subscription(user_id).await?;
        Ok(entitlement::evaluate(subscription.as_ref(), now))
    }

    pub async fn get_entitlement(
        &self,
        principal: Principal,
        now: DateTime<Utc>,
    ) -> AppResult<EntitlementResponse> {
        let subscription = self.get_subscription(principal.user_id).await?;
        Ok(EntitlementResponse {
            entitlement: entitlement::evaluate(subscription.as_ref(), now),
            subscription: subscription.map(SubscriptionResponse::from),
        })
    }

    pub async fn has_template_payment(&self, user_id: Uuid, template_id: &str) -> AppResult<bool> {
        let payment = template_payments::Entity::find()
            .filter(template_payments::Column::UserId.eq(user_id))
            .filter(template_payments::Column::TemplateId.eq(template_id))
            .filter(template_payments::Column::PaymentStatus.eq(TEMPLATE_PAYMENT_ACTIVE))
            .one(&self.pool)
            .await?;
        Ok(payment.is_some())
    }

    /// Opens the one-time trial window. A user who already has any
    /// subscription row, trial or paid, cannot start another.
    pub async fn start_trial(
        &self,
        principal: Principal,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<SubscriptionResponse> {
        let plan = self.find_plan(plan_id).await?;

        if self.get_subscription(principal.user_id).await?.is_some() {
            return Err(AppError::Conflict("Trial already used".to_string()));
        }

        let subscription = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(principal.user_id),
            plan_id: Set(plan.id),
            status: Set(SubscriptionStatus::Trial),
            trial_start: Set(Some(now)),
            trial_end: Set(Some(now + Duration::days(self.trial_days))),
            subscription_start: Set(None),
            subscription_end: Set(None),
            stripe_payment_intent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Trial already used".to_string())
            }
            _ => AppError::from(e),
        })?;

        log::info!(
            "Started {}-day trial for user {}",
            self.trial_days,
            principal.user_id
        );
        Ok(SubscriptionResponse::from(subscription))
    }

    pub async fn create_payment(
        &self,
        principal: Principal,
        request: CreatePaymentRequest,
    ) -> AppResult<CreatePaymentResponse> {
        let plan = self.find_plan(request.plan_id).await?;

        let mut metadata = HashMap::new();
        metadata.insert(META_USER_ID.to_string(), principal.user_id.to_string());
        metadata.insert(META_PLAN_ID.to_string(), plan.id.to_string());
        if let Some(template_id) = request.template_id.as_deref() {
            if find_template(template_id).is_none() {
                return Err(AppError::ValidationError(format!(
                    "Unknown template '{template_id}'"
                )));
            }
            metadata.insert(META_TEMPLATE_ID.to_string(), template_id.to_string());
        }

        let intent = self
            .stripe_service
            .create_payment_intent(
                plan.price_cents,
                metadata,
                Some(format!("{} plan", plan.name)),
            )
            .await?;

        Ok(CreatePaymentResponse {
            payment_intent_id: intent.id.to_string(),
            client_secret: intent.client_secret.unwrap_or_default(),
            amount: plan.price_cents,
            currency: self.stripe_service.currency().to_string(),
            plan_id: plan.id,
        })
    }

    /// Activates the plan paid for by a succeeded payment intent. Confirming
    /// an intent that was already applied returns the current state unchanged.
    pub async fn confirm_payment(
        &self,
        principal: Principal,
        payment_intent_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ConfirmPaymentResponse> {
        let intent = self
            .stripe_service
            .retrieve_payment_intent(payment_intent_id)
            .await?;

        if intent.status != PaymentIntentStatus::Succeeded {
            return Err(AppError::ValidationError(
                "Payment not successful".to_string(),
            ));
        }

        let owner = intent
            .metadata
            .get(META_USER_ID)
            .and_then(|v| Uuid::parse_str(v).ok());
        if owner != Some(principal.user_id) {
            log::warn!(
                "User {} tried to confirm payment intent {} owned by {:?}",
                principal.user_id,
                payment_intent_id,
                owner
            );
            return Err(AppError::Forbidden);
        }

        let plan_id = intent
            .metadata
            .get(META_PLAN_ID)
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                AppError::ValidationError("Payment is not linked to a plan".to_string())
            })?;
        let plan = self.find_plan(plan_id).await?;
        let template_id = intent.metadata.get(META_TEMPLATE_ID).map(String::as_str);

        let subscription = self
            .apply_payment(principal.user_id, payment_intent_id, &plan, template_id, now)
            .await?;

        Ok(ConfirmPaymentResponse {
            entitlement: entitlement::evaluate(Some(&subscription), now),
            subscription: SubscriptionResponse::from(subscription),
        })
    }

    /// Applies a verified payment exactly once. Every consumed intent is
    /// recorded, so replaying an older intent after a newer purchase leaves
    /// the subscription untouched.
    pub async fn apply_payment(
        &self,
        user_id: Uuid,
        payment_intent_id: &str,
        plan: &plans::Model,
        template_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<subscriptions::Model> {
        let txn = self.pool.begin().await?;

        let confirmation = payment_confirmations::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            stripe_payment_intent_id: Set(payment_intent_id.to_string()),
            plan_id: Set(plan.id),
            template_id: Set(template_id.map(str::to_string)),
            created_at: Set(now),
        };
        let inserted = match payment_confirmations::Entity::insert(confirmation)
            .on_conflict(
                OnConflict::column(payment_confirmations::Column::StripePaymentIntentId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
        {
            Ok(rows) => rows,
            Err(DbErr::RecordNotInserted) => 0,
            Err(e) => return Err(e.into()),
        };

        if inserted == 0 {
            let current = subscriptions::Entity::find()
                .filter(subscriptions::Column::UserId.eq(user_id))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Payment intent {payment_intent_id} consumed without a subscription"
                    ))
                })?;
            txn.commit().await?;
            log::info!(
                "Payment intent {} already applied for user {}",
                payment_intent_id,
                user_id
            );
            return Ok(current);
        }

        let subscription =
            upsert_plan(&txn, user_id, plan, template_id, Some(payment_intent_id), now).await?;
        txn.commit().await?;

        log::info!(
            "Activated plan {} for user {} until {:?}",
            plan.name,
            user_id,
            subscription.subscription_end
        );
        Ok(subscription)
    }

    /// Read-modify-write upsert of the user's single subscription row.
    /// Concurrent writers resolve on `user_id` with the last write winning;
    /// trial history and the row identity are preserved.
    pub async fn activate_plan(
        &self,
        user_id: Uuid,
        plan: &plans::Model,
        template_id: Option<&str>,
        payment_intent_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<subscriptions::Model> {
        let txn = self.pool.begin().await?;
        let subscription =
            upsert_plan(&txn, user_id, plan, template_id, payment_intent_id, now).await?;
        txn.commit().await?;

        log::info!(
            "Activated plan {} for user {} until {:?}",
            plan.name,
            user_id,
            subscription.subscription_end
        );
        Ok(subscription)
    }
}

async fn upsert_plan<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    plan: &plans::Model,
    template_id: Option<&str>,
    payment_intent_id: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<subscriptions::Model> {
    let months = u32::try_from(plan.duration_months).map_err(|_| {
        AppError::InternalError(format!("Plan {} has a negative duration", plan.id))
    })?;
    let subscription_end = now.checked_add_months(Months::new(months)).ok_or_else(|| {
        AppError::InternalError("Subscription end date out of range".to_string())
    })?;

    let current = subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    let row = subscriptions::ActiveModel {
        id: Set(current.as_ref().map(|c| c.id).unwrap_or_else(Uuid::new_v4)),
        user_id: Set(user_id),
        plan_id: Set(plan.id),
        status: Set(SubscriptionStatus::Active),
        trial_start: Set(current.as_ref().and_then(|c| c.trial_start)),
        trial_end: Set(current.as_ref().and_then(|c| c.trial_end)),
        subscription_start: Set(Some(now)),
        subscription_end: Set(Some(subscription_end)),
        stripe_payment_intent_id: Set(payment_intent_id.map(str::to_string)),
        created_at: Set(current.as_ref().map(|c| c.created_at).unwrap_or(now)),
        updated_at: Set(now),
    };

    subscriptions::Entity::insert(row)
        .on_conflict(
            OnConflict::column(subscriptions::Column::UserId)
                .update_columns([
                    subscriptions::Column::PlanId,
                    subscriptions::Column::Status,
                    subscriptions::Column::SubscriptionStart,
                    subscriptions::Column::SubscriptionEnd,
                    subscriptions::Column::StripePaymentIntentId,
                    subscriptions::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if let Some(template_id) = template_id {
        let payment = template_payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            template_id: Set(template_id.to_string()),
            plan_id: Set(plan.id),
            payment_status: Set(TEMPLATE_PAYMENT_ACTIVE.to_string()),
            payment_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };
        template_payments::Entity::insert(payment)
            .on_conflict(
                OnConflict::columns([
                    template_payments::Column::UserId,
                    template_payments::Column::TemplateId,
                ])
                .update_columns([
                    template_payments::Column::PlanId,
                    template_payments::Column::PaymentStatus,
                    template_payments::Column::PaymentDate,
                    template_payments::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::InternalError("Subscription vanished after upsert".to_string()))
}
