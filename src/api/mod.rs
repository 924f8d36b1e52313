//! API endpoint modules.

pub mod categorias;
pub mod dashboard;
pub mod health;
pub mod instrumentos;
pub mod marcas;
pub mod modelos;
pub mod openapi;
pub mod populate;
pub mod sub_categorias;

pub use categorias::configure_routes as configure_categoria_routes;
pub use dashboard::configure_routes as configure_dashboard_routes;
pub use health::configure_health_routes;
pub use instrumentos::configure_routes as configure_instrumento_routes;
pub use marcas::configure_routes as configure_marca_routes;
pub use modelos::configure_routes as configure_modelo_routes;
pub use openapi::ApiDoc;
pub use populate::configure_routes as configure_populate_routes;
pub use sub_categorias::configure_routes as configure_sub_categoria_routes;
