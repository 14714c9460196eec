use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use uuid::Uuid;

use super::current_principal;
use crate::models::*;
use crate::services::CardService;

#[utoipa::path(
    get,
    path = "/api/v1/cards",
    tag = "cards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's cards, newest first", body = CardListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_cards(
    card_service: web::Data<CardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service.list_cards(principal).await {
        Ok(cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(cards))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cards",
    tag = "cards",
    request_body = CardFields,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Card published", body = SavedCard),
        (status = 400, description = "Invalid card fields"),
        (status = 402, description = "Trial card limit reached or premium template locked"),
        (status = 409, description = "No unique slug could be allocated")
    )
)]
pub async fn create_card(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    fields: web::Json<CardFields>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service
        .save(principal, None, fields.into_inner(), Utc::now())
        .await
    {
        Ok(saved) => Ok(HttpResponse::Created().json(ApiResponse::success(saved))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cards/{id}",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Card", body = CardResponse),
        (status = 404, description = "Card not found")
    )
)]
pub async fn get_card(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service.get_card(principal, path.into_inner()).await {
        Ok(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(card))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/cards/{id}",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id")),
    request_body = CardFields,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Card updated; slug unchanged", body = SavedCard),
        (status = 400, description = "Invalid card fields"),
        (status = 402, description = "Premium template locked"),
        (status = 404, description = "Card not found")
    )
)]
pub async fn update_card(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    fields: web::Json<CardFields>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service
        .save(
            principal,
            Some(path.into_inner()),
            fields.into_inner(),
            Utc::now(),
        )
        .await
    {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(saved))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/cards/{id}",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Card and its views deleted"),
        (status = 404, description = "Card not found")
    )
)]
pub async fn delete_card(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service.delete_card(principal, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            (),
            "Card deleted".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/cards/{id}/visibility",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id")),
    request_body = SetVisibilityRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visibility changed", body = CardResponse),
        (status = 404, description = "Card not found")
    )
)]
pub async fn set_visibility(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<SetVisibilityRequest>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service
        .set_visibility(principal, path.into_inner(), body.is_public, Utc::now())
        .await
    {
        Ok(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(card))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cards/{id}/views",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of recorded views", body = ViewCountResponse),
        (status = 404, description = "Card not found")
    )
)]
pub async fn count_views(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service.count_views(principal, path.into_inner()).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(count))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cards/{id}/share",
    tag = "cards",
    params(("id" = Uuid, Path, description = "Card id"), ShareQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Public link and QR code image URL", body = CardShareResponse),
        (status = 400, description = "Unsupported QR size"),
        (status = 404, description = "Card not found")
    )
)]
pub async fn share_card(
    card_service: web::Data<CardService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ShareQuery>,
) -> Result<HttpResponse> {
    let principal = principal_or_respond!(req);
    match card_service
        .card_share(principal, path.into_inner(), query.size)
        .await
    {
        Ok(share) => Ok(HttpResponse::Ok().json(ApiResponse::success(share))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cards_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cards")
            .route("", web::get().to(list_cards))
            .route("", web::post().to(create_card))
            .route("/{id}", web::get().to(get_card))
            .route("/{id}", web::put().to(update_card))
            .route("/{id}", web::delete().to(delete_card))
            .route("/{id}/visibility", web::put().to(set_visibility))
            .route("/{id}/views", web::get().to(count_views))
            .route("/{id}/share", web::get().to(share_card)),
    );
}
