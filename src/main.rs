//! Instrumentos Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, http::header, web};
use sea_orm_migration::MigratorTrait;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use instrumentos_lib::api;
use instrumentos_lib::config::Config;
use instrumentos_lib::db::DbPool;
use instrumentos_lib::middleware::RequestLogger;
use instrumentos_lib::migration::Migrator;
use instrumentos_lib::services::{MediaStorage, PopulateService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and INSTR_MEDIA_DIR must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Instrumentos Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and media directory");
    }

    // Create media directories
    let storage = MediaStorage::new(&config).expect("Failed to initialize media storage");
    info!("Media storage at {}", storage.root().display());

    // Connect to PostgreSQL
    let pool = DbPool::connect(&config)
        .await
        .expect("Failed to connect to database");
    info!("Database connection established");

    // Run migrations
    Migrator::up(pool.connection(), None)
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Text-generation service for /populate
    let populate = PopulateService::new(&config, pool.clone(), storage.clone())
        .expect("Failed to initialize populate service");
    if config.openai.api_key.is_some() {
        info!("Text-generation configured (model: {})", config.openai.model);
    } else {
        warn!("OPENAI_API_KEY not set - /populate requests will be rejected");
    }

    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let max_foto_size = config.max_foto_size;

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::CONTENT_TYPE,
                ])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(populate.clone()))
            .app_data(web::Data::new(config.clone()))
            // Multipart bodies carry several photos; the per-file limit is
            // enforced in the streaming code
            .app_data(web::PayloadConfig::new(max_foto_size * 10))
            // Configure API routes
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_categoria_routes)
                    .configure(api::configure_sub_categoria_routes)
                    .configure(api::configure_marca_routes)
                    .configure(api::configure_modelo_routes)
                    .configure(api::configure_instrumento_routes)
                    .configure(api::configure_dashboard_routes)
                    .configure(api::configure_populate_routes),
            )
            // Serve stored photos and logos under the paths the API returns
            .service(Files::new("/media", storage.root()).prefer_utf8(true))
            // Interactive API documentation
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            )
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
