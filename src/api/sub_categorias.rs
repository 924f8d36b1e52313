//! SubCategoria API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{
    ListSubCategoriasQuery, SubCategoriaListResponse, SubCategoriaRequest, SubCategoriaResponse,
};

/// Create a sub-categoria under an existing categoria.
#[utoipa::path(
    post,
    path = "/subcategorias",
    tag = "SubCategorias",
    request_body = SubCategoriaRequest,
    responses(
        (status = 201, description = "Sub-categoria created", body = SubCategoriaResponse),
        (status = 404, description = "Parent categoria not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome within the categoria", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_sub_categoria(
    pool: web::Data<DbPool>,
    body: web::Json<SubCategoriaRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let created = pool.insert_sub_categoria(&req).await?;
    let categoria = pool.get_categoria_by_id(created.categoria_id).await?;
    info!("Sub-categoria created: id={}, nome={}", created.id, created.nome);

    Ok(HttpResponse::Created().json(SubCategoriaResponse::from((created, categoria))))
}

/// List sub-categorias with search, categoria filter, and pagination.
#[utoipa::path(
    get,
    path = "/subcategorias",
    tag = "SubCategorias",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on nome/descricao"),
        ("categoria_id" = Option<Uuid>, Query, description = "Filter by parent categoria"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 12, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "List of sub-categorias", body = SubCategoriaListResponse),
    )
)]
pub async fn list_sub_categorias(
    pool: web::Data<DbPool>,
    query: web::Query<ListSubCategoriasQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (rows, total) = pool.query_sub_categorias(&query).await?;

    let response = SubCategoriaListResponse {
        sub_categorias: rows.into_iter().map(SubCategoriaResponse::from).collect(),
        total,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one sub-categoria.
#[utoipa::path(
    get,
    path = "/subcategorias/{id}",
    tag = "SubCategorias",
    params(("id" = Uuid, Path, description = "Sub-categoria ID")),
    responses(
        (status = 200, description = "Sub-categoria detail", body = SubCategoriaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_sub_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let sub = pool
        .get_sub_categoria_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sub-categoria {}", id)))?;

    let categoria = pool.get_categoria_by_id(sub.categoria_id).await?;
    Ok(HttpResponse::Ok().json(SubCategoriaResponse::from((sub, categoria))))
}

/// Update a sub-categoria.
#[utoipa::path(
    put,
    path = "/subcategorias/{id}",
    tag = "SubCategorias",
    params(("id" = Uuid, Path, description = "Sub-categoria ID")),
    request_body = SubCategoriaRequest,
    responses(
        (status = 200, description = "Sub-categoria updated", body = SubCategoriaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome within the categoria", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_sub_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<SubCategoriaRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let updated = pool.update_sub_categoria(id, &req).await?;
    let categoria = pool.get_categoria_by_id(updated.categoria_id).await?;
    info!("Sub-categoria updated: id={}", id);

    Ok(HttpResponse::Ok().json(SubCategoriaResponse::from((updated, categoria))))
}

/// Delete a sub-categoria without modelos.
#[utoipa::path(
    delete,
    path = "/subcategorias/{id}",
    tag = "SubCategorias",
    params(("id" = Uuid, Path, description = "Sub-categoria ID")),
    responses(
        (status = 204, description = "Sub-categoria deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Instrumentos still attached", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_sub_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_sub_categoria(id).await?;
    info!("Sub-categoria deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Configure sub-categoria routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/subcategorias")
            .route(web::get().to(list_sub_categorias))
            .route(web::post().to(create_sub_categoria)),
    )
    .service(
        web::resource("/subcategorias/{id}")
            .route(web::get().to(get_sub_categoria))
            .route(web::put().to(update_sub_categoria))
            .route(web::delete().to(delete_sub_categoria)),
    );
}
