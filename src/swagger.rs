use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CardColors, SocialLinks, SubscriptionStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::cards::list_cards,
        handlers::cards::create_card,
        handlers::cards::get_card,
        handlers::cards::update_card,
        handlers::cards::delete_card,
        handlers::cards::set_visibility,
        handlers::cards::count_views,
        handlers::cards::share_card,
        handlers::public::get_public_card,
        handlers::public::card_page,
        handlers::templates::list_templates,
        handlers::templates::get_template,
        handlers::subscriptions::list_plans,
        handlers::subscriptions::get_entitlement,
        handlers::subscriptions::start_trial,
        handlers::subscriptions::create_payment,
        handlers::subscriptions::confirm_payment,
        handlers::admin::expire_trial_cards,
    ),
    components(
        schemas(
            ApiError,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UserResponse,
            AuthResponse,
            CardFields,
            CardColors,
            SocialLinks,
            SavedCard,
            CardResponse,
            PublicCardResponse,
            CardWithViews,
            CardListResponse,
            SetVisibilityRequest,
            ViewCountResponse,
            CardShareResponse,
            TemplateCategory,
            TemplateResponse,
            EntitlementStatus,
            Entitlement,
            SubscriptionStatus,
            SubscriptionResponse,
            EntitlementResponse,
            PlanResponse,
            StartTrialRequest,
            CreatePaymentRequest,
            CreatePaymentResponse,
            ConfirmPaymentRequest,
            ConfirmPaymentResponse,
            SweepResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Accounts and tokens"),
        (name = "cards", description = "Card builder and dashboard"),
        (name = "public", description = "Anonymous card pages"),
        (name = "templates", description = "Template catalog"),
        (name = "subscriptions", description = "Plans, trials and payments"),
        (name = "admin", description = "Operational endpoints"),
        (name = "health", description = "Liveness"),
    ),
    info(
        title = "DigiCard Backend API",
        version = "1.0.0",
        description = "Digital business cards: publishing, public pages, analytics and subscriptions"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_card_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/card/{slug}"));
        assert!(doc.paths.paths.contains_key("/api/v1/cards/{id}/share"));
        assert!(doc.components.unwrap().security_schemes.contains_key("bearer_auth"));
    }
}
