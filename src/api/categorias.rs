//! Categoria API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::common::clamp_limit;
use crate::models::{
    CategoriaListResponse, CategoriaRequest, CategoriaResponse, IdNome, ListCategoriasQuery,
};

/// Create a categoria.
#[utoipa::path(
    post,
    path = "/categorias",
    tag = "Categorias",
    request_body = CategoriaRequest,
    responses(
        (status = 201, description = "Categoria created", body = CategoriaResponse),
        (status = 409, description = "Duplicate nome", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_categoria(
    pool: web::Data<DbPool>,
    body: web::Json<CategoriaRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let created = pool.insert_categoria(&req).await?;
    info!("Categoria created: id={}, nome={}", created.id, created.nome);

    Ok(HttpResponse::Created().json(CategoriaResponse::from(created)))
}

/// List categorias with search and pagination.
#[utoipa::path(
    get,
    path = "/categorias",
    tag = "Categorias",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on nome/descricao"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 12, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "List of categorias", body = CategoriaListResponse),
    )
)]
pub async fn list_categorias(
    pool: web::Data<DbPool>,
    query: web::Query<ListCategoriasQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (categorias, total) = pool.query_categorias(&query).await?;

    let response = CategoriaListResponse {
        categorias: categorias.into_iter().map(CategoriaResponse::from).collect(),
        total,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one categoria with its sub-categoria count.
#[utoipa::path(
    get,
    path = "/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "Categoria ID")),
    responses(
        (status = 200, description = "Categoria detail", body = CategoriaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let categoria = pool
        .get_categoria_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Categoria {}", id)))?;

    let mut response = CategoriaResponse::from(categoria);
    response.total_sub_categorias = Some(pool.count_sub_categorias(id).await? as i64);

    Ok(HttpResponse::Ok().json(response))
}

/// Update a categoria.
#[utoipa::path(
    put,
    path = "/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "Categoria ID")),
    request_body = CategoriaRequest,
    responses(
        (status = 200, description = "Categoria updated", body = CategoriaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CategoriaRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let updated = pool.update_categoria(id, &req).await?;
    info!("Categoria updated: id={}", id);

    Ok(HttpResponse::Ok().json(CategoriaResponse::from(updated)))
}

/// Delete a categoria, cascading to its sub-categorias and modelos.
#[utoipa::path(
    delete,
    path = "/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "Categoria ID")),
    responses(
        (status = 204, description = "Categoria deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Instrumentos still attached", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_categoria(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_categoria(id).await?;
    info!("Categoria deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Sub-categorias of a categoria, for dependent dropdowns.
#[utoipa::path(
    get,
    path = "/categorias/{id}/subcategorias",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "Categoria ID")),
    responses(
        (status = 200, description = "Compact sub-categoria list", body = [IdNome]),
        (status = 404, description = "Categoria not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_categoria_sub_categorias(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.get_categoria_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Categoria {}", id)))?;

    let items = pool.list_sub_categorias_by_categoria(id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Configure categoria routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/categorias")
            .route(web::get().to(list_categorias))
            .route(web::post().to(create_categoria)),
    )
    .service(
        web::resource("/categorias/{id}")
            .route(web::get().to(get_categoria))
            .route(web::put().to(update_categoria))
            .route(web::delete().to(delete_categoria)),
    )
    .service(
        web::resource("/categorias/{id}/subcategorias")
            .route(web::get().to(list_categoria_sub_categorias)),
    );
}
