//! Dashboard aggregation endpoint.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::DashboardResponse;

/// Collection overview: totals, value sums, and per-group counts.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Aggregated collection overview", body = DashboardResponse),
    )
)]
pub async fn get_dashboard(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let dashboard = pool.get_dashboard().await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboard").route(web::get().to(get_dashboard)));
}
