//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Instrumentos Server",
        version = "0.3.0",
        description = "API server for a musical instrument collection catalog: categorias, marcas, modelos, instrumentos with photos, dashboard aggregation, and AI-backed population"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Categoria endpoints
        api::categorias::create_categoria,
        api::categorias::list_categorias,
        api::categorias::get_categoria,
        api::categorias::update_categoria,
        api::categorias::delete_categoria,
        api::categorias::list_categoria_sub_categorias,
        // Sub-categoria endpoints
        api::sub_categorias::create_sub_categoria,
        api::sub_categorias::list_sub_categorias,
        api::sub_categorias::get_sub_categoria,
        api::sub_categorias::update_sub_categoria,
        api::sub_categorias::delete_sub_categoria,
        // Marca endpoints
        api::marcas::create_marca,
        api::marcas::list_marcas,
        api::marcas::get_marca,
        api::marcas::update_marca,
        api::marcas::upload_marca_logotipo,
        api::marcas::delete_marca,
        api::marcas::list_marca_modelos,
        // Modelo endpoints
        api::modelos::create_modelo,
        api::modelos::list_modelos,
        api::modelos::get_modelo,
        api::modelos::update_modelo,
        api::modelos::delete_modelo,
        // Instrumento endpoints
        api::instrumentos::create_instrumento,
        api::instrumentos::list_instrumentos,
        api::instrumentos::get_instrumento,
        api::instrumentos::update_instrumento,
        api::instrumentos::delete_instrumento,
        api::instrumentos::add_instrumento_foto,
        api::instrumentos::delete_foto,
        // Dashboard
        api::dashboard::get_dashboard,
        // Populate
        api::populate::populate,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::FieldError,
            models::IdNome,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Categorias
            models::CategoriaRequest,
            models::CategoriaResponse,
            models::CategoriaListResponse,
            models::SubCategoriaRequest,
            models::SubCategoriaResponse,
            models::SubCategoriaListResponse,
            // Marcas and modelos
            models::MarcaRequest,
            models::MarcaResponse,
            models::MarcaListResponse,
            models::ModeloRequest,
            models::ModeloResponse,
            models::ModeloListResponse,
            // Instrumentos
            models::EstadoConservacao,
            models::StatusInstrumento,
            models::InstrumentoRequest,
            models::InstrumentoSummary,
            models::InstrumentoDetailResponse,
            models::InstrumentoListResponse,
            models::FotoResponse,
            // Dashboard
            models::DashboardResponse,
            models::GrupoContagem,
            models::ContagemChave,
            // Populate
            models::PopulateRequest,
            models::PopulateResponse,
            models::PopulateTableResult,
        )
    ),
    tags(
        (name = "Health", description = "Service health and readiness"),
        (name = "Categorias", description = "Categoria management"),
        (name = "SubCategorias", description = "Sub-categoria management"),
        (name = "Marcas", description = "Marca management and logos"),
        (name = "Modelos", description = "Modelo management"),
        (name = "Instrumentos", description = "Inventory units and photos"),
        (name = "Dashboard", description = "Collection aggregation"),
        (name = "Populate", description = "AI-backed catalog population"),
    )
)]
pub struct ApiDoc;
