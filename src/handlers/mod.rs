use actix_web::{HttpMessage, HttpRequest, web};

use crate::error::{AppError, AppResult};
use crate::models::Principal;

/// Unwraps the authenticated principal or returns the error response from
/// the enclosing handler.
macro_rules! principal_or_respond {
    ($req:expr) => {
        match current_principal(&$req) {
            Ok(p) => p,
            Err(e) => return Ok(e.error_response()),
        }
    };
}

pub mod admin;
pub mod auth;
pub mod cards;
pub mod health;
pub mod public;
pub mod subscriptions;
pub mod templates;

pub use admin::admin_config;
pub use auth::auth_config;
pub use cards::cards_config;
pub use health::health_config;
pub use public::{card_page_config, public_config};
pub use subscriptions::{plans_config, subscription_config};
pub use templates::templates_config;

/// Principal stored by the auth middleware.
pub fn current_principal(req: &HttpRequest) -> AppResult<Principal> {
    req.extensions()
        .get::<Principal>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

/// Every route of the service: the JSON API under `/api/v1` plus the
/// root-level card page and health check.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health_config)
        .configure(card_page_config)
        .service(
            web::scope("/api/v1")
                .configure(auth_config)
                .configure(cards_config)
                .configure(public_config)
                .configure(templates_config)
                .configure(plans_config)
                .configure(subscription_config)
                .configure(admin_config),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, StripeConfig};
    use crate::external::StripeService;
    use crate::middlewares::AuthMiddleware;
    use crate::services::*;
    use crate::test_support::{app_config, setup_db};
    use crate::utils::JwtService;
    use actix_web::http::StatusCode;
    use actix_web::{App, ResponseError, test};
    use serde_json::{Value, json};

    macro_rules! test_app {
        ($db:expr) => {{
            let db = $db;
            let jwt = JwtService::new("test-secret", 3600, 86400);
            let subs = SubscriptionService::new(
                db.clone(),
                StripeService::new(StripeConfig::default()),
                7,
            );
            test::init_service(
                App::new()
                    .wrap(AuthMiddleware::new(jwt.clone()))
                    .app_data(web::Data::new(AuthService::new(db.clone(), jwt)))
                    .app_data(web::Data::new(CardService::new(
                        db.clone(),
                        subs.clone(),
                        app_config(),
                    )))
                    .app_data(web::Data::new(PublicCardService::new(db.clone())))
                    .app_data(web::Data::new(TemplateService::new()))
                    .app_data(web::Data::new(TrialExpiryService::new(db.clone())))
                    .app_data(web::Data::new(AdminConfig {
                        api_key: "admin-secret".to_string(),
                    }))
                    .app_data(web::Data::new(subs))
                    .configure(configure),
            )
            .await
        }};
    }

    macro_rules! register {
        ($app:expr, $email:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(json!({"email": $email, "password": "Password123"}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body["data"]["access_token"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_health_and_templates_are_public() {
        let app = test_app!(setup_db().await);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/templates?category=creative")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::get().uri("/api/v1/plans").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let app = test_app!(setup_db().await);
        let req = test::TestRequest::get().uri("/api/v1/cards").to_request();
        match test::try_call_service(&app, req).await {
            Ok(resp) => panic!("expected rejection, got {}", resp.status()),
            Err(err) => assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::UNAUTHORIZED
            ),
        }
    }

    #[actix_web::test]
    async fn test_publish_and_resolve_flow() {
        let app = test_app!(setup_db().await);
        let token = register!(app, "ada@example.com");

        let req = test::TestRequest::post()
            .uri("/api/v1/cards")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"name": "Ada Lovelace", "template": "modern-geometric"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let slug = body["data"]["slug"].as_str().unwrap().to_string();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/card/{slug}"))
            .insert_header(("User-Agent", "integration-test"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Ada Lovelace");
        assert!(body["data"].get("user_id").is_none());

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/cards/{id}/views"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["views"], 1);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/cards/{id}/visibility"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"is_public": false}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/public/cards/{slug}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_admin_sweep_requires_key() {
        let app = test_app!(setup_db().await);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/expire-trial-cards")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/expire-trial-cards")
            .insert_header(("X-Admin-Key", "admin-secret"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["affected_cards"], 0);
    }

    #[::core::prelude::v1::test]
    fn test_missing_principal_is_auth_error() {
        let req = test::TestRequest::default().to_http_request();
        let err = current_principal(&req).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
