use std::collections::HashMap;
use std::str::FromStr;

use stripe::{Client, CreatePaymentIntent, Currency, PaymentIntent, PaymentIntentId};

use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};

/// Metadata keys attached to every payment intent.
pub const META_USER_ID: &str = "user_id";
pub const META_PLAN_ID: &str = "plan_id";
pub const META_TEMPLATE_ID: &str = "template_id";

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    currency: Currency,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        let code = serde_json::Value::String(config.currency.to_ascii_lowercase());
        let currency = serde_json::from_value::<Currency>(code).unwrap_or_else(|_| {
            log::warn!(
                "Unknown stripe currency '{}', falling back to inr",
                config.currency
            );
            Currency::INR
        });
        Self {
            client: Client::new(config.secret_key),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub async fn create_payment_intent(
        &self,
        amount: i64,
        metadata: HashMap<String, String>,
        description: Option<String>,
    ) -> AppResult<PaymentIntent> {
        let mut params = CreatePaymentIntent::new(amount, self.currency);
        params.metadata = Some(metadata);
        params.description = description.as_deref();

        let intent = PaymentIntent::create(&self.client, params).await?;
        log::info!("Created payment intent {} for {} {}", intent.id, amount, self.currency);
        Ok(intent)
    }

    pub async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AppResult<PaymentIntent> {
        let id = PaymentIntentId::from_str(payment_intent_id)
            .map_err(|_| AppError::ValidationError("Invalid payment intent id".to_string()))?;
        let intent = PaymentIntent::retrieve(&self.client, &id, &[]).await?;
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_currency_falls_back_to_inr() {
        let service = StripeService::new(StripeConfig {
            secret_key: "sk_test_dummy".to_string(),
            currency: "not-a-currency".to_string(),
        });
        assert_eq!(service.currency(), Currency::INR);
    }

    #[test]
    fn currency_is_case_insensitive() {
        let service = StripeService::new(StripeConfig {
            secret_key: "sk_test_dummy".to_string(),
            currency: "USD".to_string(),
        });
        assert_eq!(service.currency(), Currency::USD);
    }
}
