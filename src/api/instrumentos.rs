//! Instrumento API handlers.
//!
//! Creation arrives as multipart (text fields + photo files); updates are
//! plain JSON. Photo bytes are validated fully in memory before any file or
//! row is written.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::db::instrumentos::NewFoto;
use crate::error::{AppError, AppResult, FieldError};
use crate::models::common::clamp_limit;
use crate::models::{
    FotoResponse, InstrumentoDetailResponse, InstrumentoListResponse, InstrumentoRequest,
    InstrumentoSummary, ListInstrumentosQuery,
};
use crate::services::MediaStorage;
use crate::services::upload::{collect_multipart, validate_foto};

/// Create an instrumento with optional photos (multipart field `fotos`).
#[utoipa::path(
    post,
    path = "/instrumentos",
    tag = "Instrumentos",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Instrumento created", body = InstrumentoDetailResponse),
        (status = 404, description = "Modelo not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate codigo", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_instrumento(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    config: web::Data<crate::config::Config>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (fields, files) = collect_multipart(payload, config.max_foto_size).await?;
    let req = InstrumentoRequest::from_fields(&fields)?;

    // Validate every photo before anything touches disk or the database.
    let mut validated = Vec::new();
    for file in files.iter().filter(|f| f.field == "fotos") {
        let ext = validate_foto("fotos", &file.data, config.max_foto_size)?;
        validated.push((ext, &file.data));
    }

    let id = Uuid::now_v7();
    let mut saved_paths = Vec::new();
    for (ext, data) in &validated {
        let rel = storage.save_foto(id, ext, data).await?;
        saved_paths.push(rel);
    }

    let fotos = saved_paths
        .iter()
        .enumerate()
        .map(|(i, rel)| NewFoto {
            imagem: rel.clone(),
            descricao: None,
            ordem: i as i32,
        })
        .collect();

    let created = match pool.insert_instrumento_with_fotos(id, &req, fotos).await {
        Ok(created) => created,
        Err(e) => {
            // Roll the files back so a failed insert leaves no orphans.
            for rel in &saved_paths {
                storage.delete_file(rel).await;
            }
            return Err(e);
        }
    };
    info!(
        "Instrumento created: id={}, codigo={}, fotos={}",
        created.id,
        created.codigo,
        saved_paths.len()
    );

    detail_response(&pool, created.id, HttpResponse::Created()).await
}

/// List instrumentos with filters and pagination.
#[utoipa::path(
    get,
    path = "/instrumentos",
    tag = "Instrumentos",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on codigo/numero_serie/modelo"),
        ("categoria_id" = Option<Uuid>, Query, description = "Filter by categoria (through modelo)"),
        ("marca_id" = Option<Uuid>, Query, description = "Filter by marca (through modelo)"),
        ("modelo_id" = Option<Uuid>, Query, description = "Filter by modelo"),
        ("estado" = Option<String>, Query, description = "Filter by estado_conservacao"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 12, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
    ),
    responses(
        (status = 200, description = "List of instrumentos", body = InstrumentoListResponse),
    )
)]
pub async fn list_instrumentos(
    pool: web::Data<DbPool>,
    query: web::Query<ListInstrumentosQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (rows, total) = pool.query_instrumentos(&query).await?;

    let response = InstrumentoListResponse {
        instrumentos: rows
            .into_iter()
            .map(|r| InstrumentoSummary::from_parts(r.instrumento, r.modelo, r.marca))
            .collect(),
        total,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one instrumento with its photos.
#[utoipa::path(
    get,
    path = "/instrumentos/{id}",
    tag = "Instrumentos",
    params(("id" = Uuid, Path, description = "Instrumento ID")),
    responses(
        (status = 200, description = "Instrumento detail", body = InstrumentoDetailResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_instrumento(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    detail_response(&pool, path.into_inner(), HttpResponse::Ok()).await
}

/// Update an instrumento's fields (JSON body, photos unchanged).
#[utoipa::path(
    put,
    path = "/instrumentos/{id}",
    tag = "Instrumentos",
    params(("id" = Uuid, Path, description = "Instrumento ID")),
    request_body = InstrumentoRequest,
    responses(
        (status = 200, description = "Instrumento updated", body = InstrumentoDetailResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate codigo", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_instrumento(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<InstrumentoRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let updated = pool.update_instrumento(id, &req).await?;
    info!("Instrumento updated: id={}", id);

    detail_response(&pool, updated.id, HttpResponse::Ok()).await
}

/// Delete an instrumento. Its photo files are removed best-effort.
#[utoipa::path(
    delete,
    path = "/instrumentos/{id}",
    tag = "Instrumentos",
    params(("id" = Uuid, Path, description = "Instrumento ID")),
    responses(
        (status = 204, description = "Instrumento deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_instrumento(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let paths = pool.delete_instrumento(id).await?;

    for rel in &paths {
        storage.delete_file(rel).await;
    }
    storage.delete_instrumento_dir(id).await;
    info!("Instrumento deleted: id={}, fotos={}", id, paths.len());

    Ok(HttpResponse::NoContent().finish())
}

/// Attach a photo to an existing instrumento (multipart field `foto`,
/// optional text field `descricao`).
#[utoipa::path(
    post,
    path = "/instrumentos/{id}/fotos",
    tag = "Instrumentos",
    params(("id" = Uuid, Path, description = "Instrumento ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo attached", body = FotoResponse),
        (status = 404, description = "Instrumento not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Image validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_instrumento_foto(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    config: web::Data<crate::config::Config>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.get_instrumento_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Instrumento {}", id)))?;

    let (fields, files) = collect_multipart(payload, config.max_foto_size).await?;
    let file = files.iter().find(|f| f.field == "foto").ok_or_else(|| {
        AppError::Validation(vec![FieldError::new("foto", "arquivo de imagem obrigatório")])
    })?;

    let ext = validate_foto("foto", &file.data, config.max_foto_size)?;
    let rel = storage.save_foto(id, ext, &file.data).await?;

    let descricao = fields.get("descricao").cloned().filter(|d| !d.is_empty());
    let foto = match pool.insert_foto(id, rel.clone(), descricao).await {
        Ok(foto) => foto,
        Err(e) => {
            storage.delete_file(&rel).await;
            return Err(e);
        }
    };
    info!("Foto attached: instrumento={}, foto={}", id, foto.id);

    Ok(HttpResponse::Created().json(FotoResponse::from(foto)))
}

/// Remove one photo; the file is deleted best-effort.
#[utoipa::path(
    delete,
    path = "/fotos/{id}",
    tag = "Instrumentos",
    params(("id" = Uuid, Path, description = "Foto ID")),
    responses(
        (status = 204, description = "Photo removed"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_foto(
    pool: web::Data<DbPool>,
    storage: web::Data<MediaStorage>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let rel = pool.delete_foto(id).await?;
    storage.delete_file(&rel).await;
    info!("Foto deleted: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

async fn detail_response(
    pool: &DbPool,
    id: Uuid,
    mut builder: actix_web::HttpResponseBuilder,
) -> AppResult<HttpResponse> {
    let parts = pool
        .get_instrumento_with_parents(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Instrumento {}", id)))?;
    let fotos = pool.list_fotos_by_instrumento(id).await?;

    Ok(builder.json(InstrumentoDetailResponse::from_parts(
        parts.instrumento,
        parts.modelo,
        parts.marca,
        fotos,
    )))
}

/// Configure instrumento routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/instrumentos")
            .route(web::get().to(list_instrumentos))
            .route(web::post().to(create_instrumento)),
    )
    .service(
        web::resource("/instrumentos/{id}")
            .route(web::get().to(get_instrumento))
            .route(web::put().to(update_instrumento))
            .route(web::delete().to(delete_instrumento)),
    )
    .service(
        web::resource("/instrumentos/{id}/fotos").route(web::post().to(add_instrumento_foto)),
    )
    .service(web::resource("/fotos/{id}").route(web::delete().to(delete_foto)));
}
