//! AI population endpoint.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::error::AppResult;
use crate::models::{PopulateRequest, PopulateResponse};
use crate::services::PopulateService;

/// Generate catalog rows with the configured text model.
///
/// Tables are processed in dependency order; a failing table is reported in
/// its result entry and does not abort the others.
#[utoipa::path(
    post,
    path = "/populate",
    tag = "Populate",
    request_body = PopulateRequest,
    responses(
        (status = 200, description = "Per-table population results", body = PopulateResponse),
        (status = 400, description = "Unknown table or invalid quantity", body = crate::error::ErrorResponse),
        (status = 500, description = "API key not configured", body = crate::error::ErrorResponse),
        (status = 502, description = "Text-generation service failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn populate(
    service: web::Data<PopulateService>,
    body: web::Json<PopulateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    info!(
        "Population requested: tables={:?}, quantidade={}",
        req.tables, req.quantidade
    );

    let response = service.populate(&req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configure populate routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/populate").route(web::post().to(populate)));
}
