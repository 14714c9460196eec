use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::models::*;
use crate::services::TrialExpiryService;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// An empty configured key disables the admin endpoints entirely.
fn check_admin_key(req: &HttpRequest, admin: &AdminConfig) -> Result<(), AppError> {
    if admin.api_key.is_empty() {
        return Err(AppError::Forbidden);
    }
    let supplied = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !keys_match(supplied.as_bytes(), admin.api_key.as_bytes()) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Constant-time comparison: every byte of the expected key is visited
/// whatever the supplied value looks like.
fn keys_match(supplied: &[u8], expected: &[u8]) -> bool {
    let diff = expected
        .iter()
        .enumerate()
        .fold(supplied.len() ^ expected.len(), |acc, (i, &b)| {
            acc | usize::from(supplied.get(i).copied().unwrap_or(0) ^ b)
        });
    diff == 0
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/expire-trial-cards",
    tag = "admin",
    params(("X-Admin-Key" = String, Header, description = "Configured admin key")),
    responses(
        (status = 200, description = "Cards of lapsed trials hidden", body = SweepResponse),
        (status = 403, description = "Missing or wrong admin key")
    )
)]
pub async fn expire_trial_cards(
    sweep_service: web::Data<TrialExpiryService>,
    admin: web::Data<AdminConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = check_admin_key(&req, &admin) {
        return Ok(e.error_response());
    }

    match sweep_service.expire_trial_cards(Utc::now()).await {
        Ok(affected_cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(SweepResponse {
            affected_cards,
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").route("/expire-trial-cards", web::post().to(expire_trial_cards)),
    );
}
