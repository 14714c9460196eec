use crate::entities::{
    SubscriptionStatus, plan_entity as plans, subscription_entity as subscriptions,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Derived access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementStatus {
    None,
    Trial,
    Active,
    Expired,
}

impl std::fmt::Display for EntitlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntitlementStatus::None => write!(f, "none"),
            EntitlementStatus::Trial => write!(f, "trial"),
            EntitlementStatus::Active => write!(f, "active"),
            EntitlementStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Entitlement {
    pub status: EntitlementStatus,
    pub is_active: bool,
    pub is_trial_active: bool,
    pub is_subscription_active: bool,
    /// Whole days left in the trial, rounded up; only set while on trial.
    pub days_left: Option<i64>,
}

impl Entitlement {
    /// Premium templates and features are unlocked for paid subscribers only.
    pub fn has_premium_access(&self) -> bool {
        self.status == EntitlementStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub trial_start: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<subscriptions::Model> for SubscriptionResponse {
    fn from(m: subscriptions::Model) -> Self {
        Self {
            id: m.id,
            plan_id: m.plan_id,
            status: m.status,
            trial_start: m.trial_start,
            trial_end: m.trial_end,
            subscription_start: m.subscription_start,
            subscription_end: m.subscription_end,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntitlementResponse {
    pub entitlement: Entitlement,
    pub subscription: Option<SubscriptionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub duration_months: i32,
    pub price_cents: i64,
    pub features: Vec<String>,
}

const BASE_PLAN_FEATURES: [&str; 7] = [
    "Unlimited digital cards",
    "Premium templates",
    "Custom branding",
    "Analytics & insights",
    "Priority support",
    "Export as image/PDF",
    "Social media integration",
];

/// Longer plans unlock extra features on top of the base list.
pub fn plan_features(duration_months: i32) -> Vec<String> {
    let mut features: Vec<String> = BASE_PLAN_FEATURES.iter().map(|f| f.to_string()).collect();
    if duration_months >= 3 {
        features.push("Advanced customization".to_string());
    }
    if duration_months >= 6 {
        features.push("WhatsApp integration".to_string());
    }
    if duration_months >= 12 {
        features.push("Bulk card creation".to_string());
    }
    features
}

impl From<plans::Model> for PlanResponse {
    fn from(m: plans::Model) -> Self {
        Self {
            id: m.id,
            features: plan_features(m.duration_months),
            name: m.name,
            duration_months: m.duration_months,
            price_cents: m.price_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartTrialRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub plan_id: Uuid,
    /// Template being purchased alongside the plan, if any.
    #[schema(example = "professional-navy")]
    pub template_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub plan_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    pub subscription: SubscriptionResponse,
    pub entitlement: Entitlement,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SweepResponse {
    pub affected_cards: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_features_grow_with_duration() {
        assert_eq!(plan_features(1).len(), 7);
        assert!(plan_features(3).contains(&"Advanced customization".to_string()));
        assert!(!plan_features(3).contains(&"WhatsApp integration".to_string()));
        assert!(plan_features(6).contains(&"WhatsApp integration".to_string()));
        assert_eq!(plan_features(12).len(), 10);
        assert_eq!(plan_features(12).last().unwrap(), "Bulk card creation");
    }
}
