use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::TemplateService;

#[utoipa::path(
    get,
    path = "/api/v1/templates",
    tag = "templates",
    params(TemplateQuery),
    responses(
        (status = 200, description = "Template catalog", body = [TemplateResponse]),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn list_templates(
    template_service: web::Data<TemplateService>,
    query: web::Query<TemplateQuery>,
) -> Result<HttpResponse> {
    match template_service.list_templates(query.category.as_deref()) {
        Ok(templates) => Ok(HttpResponse::Ok().json(ApiResponse::success(templates))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/templates/{id}",
    tag = "templates",
    params(("id" = String, Path, description = "Template id")),
    responses(
        (status = 200, description = "Template", body = TemplateResponse),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_template(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match template_service.get_template(&path) {
        Ok(template) => Ok(HttpResponse::Ok().json(ApiResponse::success(template))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn templates_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/templates")
            .route("", web::get().to(list_templates))
            .route("/{id}", web::get().to(get_template)),
    );
}
