use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, http::header, web};
use chrono::Utc;

use crate::models::*;
use crate::services::PublicCardService;

fn viewer_context(req: &HttpRequest) -> ViewerContext {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    ViewerContext {
        user_agent: header_value(header::USER_AGENT),
        referrer: header_value(header::REFERER),
        viewer_ip: req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string),
    }
}

async fn resolve(
    public_service: &PublicCardService,
    req: &HttpRequest,
    slug: &str,
) -> Result<HttpResponse> {
    match public_service
        .resolve(slug, viewer_context(req), Utc::now())
        .await
    {
        Ok(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(card))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/public/cards/{slug}",
    tag = "public",
    params(("slug" = String, Path, description = "Card slug")),
    responses(
        (status = 200, description = "Public card, view recorded", body = PublicCardResponse),
        (status = 404, description = "No public card with this slug")
    )
)]
pub async fn get_public_card(
    public_service: web::Data<PublicCardService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    resolve(&public_service, &req, &path).await
}

#[utoipa::path(
    get,
    path = "/card/{slug}",
    tag = "public",
    params(("slug" = String, Path, description = "Card slug")),
    responses(
        (status = 200, description = "Public card, view recorded", body = PublicCardResponse),
        (status = 404, description = "No public card with this slug")
    )
)]
pub async fn card_page(
    public_service: web::Data<PublicCardService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    resolve(&public_service, &req, &path).await
}

/// Mounted under `/api/v1`.
pub fn public_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/public").route("/cards/{slug}", web::get().to(get_public_card)));
}

/// The shareable link, mounted at the application root.
pub fn card_page_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/card/{slug}", web::get().to(card_page));
}
