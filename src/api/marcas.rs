//! Marca API handlers, including the logo upload endpoint.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::clamp_limit;
use crate::models::{IdNome, ListMarcasQuery, MarcaListResponse, MarcaRequest, MarcaResponse};
use crate::services::MediaStorage;
use crate::services::upload::{collect_multipart, validate_logotipo};

/// Create a marca. Logo upload is a separate endpoint.
#[utoipa::path(
    post,
    path = "/marcas",
    tag = "Marcas",
    request_body = MarcaRequest,
    responses(
        (status = 201, description = "Marca created", body = MarcaResponse),
        (status = 409, description = "Duplicate nome", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_marca(
    pool: web::Data<DbPool>,
    body: web::Json<MarcaRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let created = pool.insert_marca(&req).await?;
    info!("Marca created: id={}, nome={}", created.id, created.nome);

    Ok(HttpResponse::Created().json(MarcaResponse::from(created)))
}

/// List marcas with search, country filter, and pagination.
#[utoipa::path(
    get,
    path = "/marcas",
    tag = "Marcas",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on nome/descricao/website"),
        ("pais" = Option<String>, Query, description = "Filter by country of origin"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 12, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "List of marcas with the distinct country list", body = MarcaListResponse),
    )
)]
pub async fn list_marcas(
    pool: web::Data<DbPool>,
    query: web::Query<ListMarcasQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (marcas, total) = pool.query_marcas(&query).await?;
    let paises = pool.list_marca_paises().await?;

    let response = MarcaListResponse {
        marcas: marcas.into_iter().map(MarcaResponse::from).collect(),
        paises,
        total,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one marca.
#[utoipa::path(
    get,
    path = "/marcas/{id}",
    tag = "Marcas",
    params(("id" = Uuid, Path, description = "Marca ID")),
    responses(
        (status = 200, description = "Marca detail", body = MarcaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_marca(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let marca = pool
        .get_marca_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

    Ok(HttpResponse::Ok().json(MarcaResponse::from(marca)))
}

/// Update a marca's text fields.
#[utoipa::path(
    put,
    path = "/marcas/{id}",
    tag = "Marcas",
    params(("id" = Uuid, Path, description = "Marca ID")),
    request_body = MarcaRequest,
    responses(
        (status = 200, description = "Marca updated", body = MarcaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate nome", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_marca(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<MarcaRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let updated = pool.update_marca(id, &req).await?;
    info!("Marca updated: id={}", id);

    Ok(HttpResponse::Ok().json(MarcaResponse::from(updated)))
}

/// Replace a marca's logo (multipart field `logotipo`).
#[utoipa::path(
    put,
    path = "/marcas/{id}/logotipo",
    tag = "Marcas",
    params(("id" = Uuid, Path, description = "Marca ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo replaced", body = MarcaResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Image validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_marca_logotipo(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    config: web::Data<crate::config::Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let marca = pool
        .get_marca_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

    let (_fields, files) = collect_multipart(payload, config.max_logo_size).await?;
    let file = files
        .iter()
        .find(|f| f.field == "logotipo")
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new(
                "logotipo",
                "arquivo de imagem obrigatório",
            )])
        })?;

    let ext = validate_logotipo(
        "logotipo",
        &file.data,
        config.max_logo_size,
        config.min_logo_dimension,
    )?;

    let rel = storage.save_logotipo(&marca.nome, ext, &file.data).await?;
    let old = marca.logotipo.clone();
    let updated = pool.set_marca_logotipo(id, Some(rel)).await?;

    if let Some(old) = old {
        storage.delete_file(&old).await;
    }
    info!("Marca logo replaced: id={}", id);

    Ok(HttpResponse::Ok().json(MarcaResponse::from(updated)))
}

/// Delete a marca without modelos. Its logo file is removed best-effort.
#[utoipa::path(
    delete,
    path = "/marcas/{id}",
    tag = "Marcas",
    params(("id" = Uuid, Path, description = "Marca ID")),
    responses(
        (status = 204, description = "Marca deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Instrumentos still attached", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_marca(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let logotipo = pool.delete_marca(id).await?;

    if let Some(rel) = logotipo {
        storage.delete_file(&rel).await;
    }
    info!("Marca deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Modelos of a marca, for dependent dropdowns.
#[utoipa::path(
    get,
    path = "/marcas/{id}/modelos",
    tag = "Marcas",
    params(("id" = Uuid, Path, description = "Marca ID")),
    responses(
        (status = 200, description = "Compact modelo list", body = [IdNome]),
        (status = 404, description = "Marca not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_marca_modelos(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.get_marca_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Marca {}", id)))?;

    let items = pool.list_modelos_by_marca(id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Configure marca routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/marcas")
            .route(web::get().to(list_marcas))
            .route(web::post().to(create_marca)),
    )
    .service(
        web::resource("/marcas/{id}")
            .route(web::get().to(get_marca))
            .route(web::put().to(update_marca))
            .route(web::delete().to(delete_marca)),
    )
    .service(
        web::resource("/marcas/{id}/logotipo").route(web::put().to(upload_marca_logotipo)),
    )
    .service(web::resource("/marcas/{id}/modelos").route(web::get().to(list_marca_modelos)));
}
