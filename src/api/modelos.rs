//! Modelo API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{ListModelosQuery, ModeloListResponse, ModeloRequest, ModeloResponse};

/// Create a modelo under an existing marca and sub-categoria.
#[utoipa::path(
    post,
    path = "/modelos",
    tag = "Modelos",
    request_body = ModeloRequest,
    responses(
        (status = 201, description = "Modelo created", body = ModeloResponse),
        (status = 404, description = "Parent marca or sub-categoria not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome within the marca", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_modelo(
    pool: web::Data<DbPool>,
    body: web::Json<ModeloRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let created = pool.insert_modelo(&req).await?;
    let marca = pool.get_marca_by_id(created.marca_id).await?;
    let sub = pool.get_sub_categoria_by_id(created.sub_categoria_id).await?;
    info!("Modelo created: id={}, nome={}", created.id, created.nome);

    Ok(HttpResponse::Created().json(ModeloResponse::from_parts(created, marca, sub)))
}

/// List modelos with search, parent filters, and pagination.
#[utoipa::path(
    get,
    path = "/modelos",
    tag = "Modelos",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on nome/descricao"),
        ("marca_id" = Option<Uuid>, Query, description = "Filter by marca"),
        ("sub_categoria_id" = Option<Uuid>, Query, description = "Filter by sub-categoria"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 12, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "List of modelos", body = ModeloListResponse),
    )
)]
pub async fn list_modelos(
    pool: web::Data<DbPool>,
    query: web::Query<ListModelosQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (rows, total) = pool.query_modelos(&query).await?;

    let response = ModeloListResponse {
        modelos: rows
            .into_iter()
            .map(|r| ModeloResponse::from_parts(r.modelo, r.marca, r.sub_categoria))
            .collect(),
        total,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one modelo.
#[utoipa::path(
    get,
    path = "/modelos/{id}",
    tag = "Modelos",
    params(("id" = Uuid, Path, description = "Modelo ID")),
    responses(
        (status = 200, description = "Modelo detail", body = ModeloResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_modelo(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let modelo = pool
        .get_modelo_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Modelo {}", id)))?;

    let marca = pool.get_marca_by_id(modelo.marca_id).await?;
    let sub = pool.get_sub_categoria_by_id(modelo.sub_categoria_id).await?;

    Ok(HttpResponse::Ok().json(ModeloResponse::from_parts(modelo, marca, sub)))
}

/// Update a modelo.
#[utoipa::path(
    put,
    path = "/modelos/{id}",
    tag = "Modelos",
    params(("id" = Uuid, Path, description = "Modelo ID")),
    request_body = ModeloRequest,
    responses(
        (status = 200, description = "Modelo updated", body = ModeloResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome within the marca", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_modelo(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ModeloRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let updated = pool.update_modelo(id, &req).await?;
    let marca = pool.get_marca_by_id(updated.marca_id).await?;
    let sub = pool.get_sub_categoria_by_id(updated.sub_categoria_id).await?;
    info!("Modelo updated: id={}", id);

    Ok(HttpResponse::Ok().json(ModeloResponse::from_parts(updated, marca, sub)))
}

/// Delete a modelo without instrumentos.
#[utoipa::path(
    delete,
    path = "/modelos/{id}",
    tag = "Modelos",
    params(("id" = Uuid, Path, description = "Modelo ID")),
    responses(
        (status = 204, description = "Modelo deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Instrumentos still attached", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_modelo(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_modelo(id).await?;
    info!("Modelo deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Configure modelo routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/modelos")
            .route(web::get().to(list_modelos))
            .route(web::post().to(create_modelo)),
    )
    .service(
        web::resource("/modelos/{id}")
            .route(web::get().to(get_modelo))
            .route(web::put().to(update_modelo))
            .route(web::delete().to(delete_modelo)),
    );
}
