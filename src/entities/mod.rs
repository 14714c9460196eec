pub mod card_analytics;
pub mod digital_cards;
pub mod payment_confirmations;
pub mod subscription_plans;
pub mod user_subscriptions;
pub mod user_template_payments;
pub mod users;

pub use card_analytics as card_view_entity;
pub use digital_cards as card_entity;
pub use digital_cards::{CardColors, SocialLinks};
pub use payment_confirmations as payment_confirmation_entity;
pub use subscription_plans as plan_entity;
pub use user_subscriptions as subscription_entity;
pub use user_subscriptions::SubscriptionStatus;
pub use user_template_payments as template_payment_entity;
pub use users as user_entity;
