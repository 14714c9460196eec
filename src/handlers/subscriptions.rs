use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;

use super::current_principal;
use crate::models::*;
use crate::services::SubscriptionService;

#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Plans ordered by duration", body = [PlanResponse])
    )
)]
pub async fn list_plans(
    subscription_service: web::Data<SubscriptionService>,
) -> Result<HttpResponse> {
    match subscription_service.list_plans().await {
        Ok(plans) => Ok(HttpResponse::Ok().json(ApiResponse::success(plans))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/subscription",
    tag = "subscriptions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entitlement and stored subscription", body = EntitlementResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_entitlement(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match subscription_service.get_entitlement(principal, Utc::now()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscription/trial",
    tag = "subscriptions",
    request_body = StartTrialRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Trial started", body = SubscriptionResponse),
        (status = 400, description = "Unknown plan"),
        (status = 409, description = "Trial already used")
    )
)]
pub async fn start_trial(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    body: web::Json<StartTrialRequest>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match subscription_service
        .start_trial(principal, body.plan_id, Utc::now())
        .await
    {
        Ok(sub) => Ok(HttpResponse::Ok().json(ApiResponse::success(sub))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscription/payments",
    tag = "subscriptions",
    request_body = CreatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment intent created", body = CreatePaymentResponse),
        (status = 400, description = "Unknown plan or template"),
        (status = 502, description = "Payment provider rejected the request")
    )
)]
pub async fn create_payment(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    body: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match subscription_service
        .create_payment(principal, body.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscription/payments/confirm",
    tag = "subscriptions",
    request_body = ConfirmPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Plan activated", body = ConfirmPaymentResponse),
        (status = 400, description = "Payment not successful"),
        (status = 403, description = "Payment belongs to another user")
    )
)]
pub async fn confirm_payment(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    body: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match subscription_service
        .confirm_payment(principal, &body.payment_intent_id, Utc::now())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            resp,
            "Subscription activated".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plans_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/plans", web::get().to(list_plans));
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription")
            .route("", web::get().to(get_entitlement))
            .route("/trial", web::post().to(start_trial))
            .route("/payments", web::post().to(create_payment))
            .route("/payments/confirm", web::post().to(confirm_payment)),
    );
}
