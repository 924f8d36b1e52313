//! Integration tests for the health endpoint and the OpenAPI document.
//!
//! Endpoints that need a live PostgreSQL connection (readiness, CRUD) are
//! covered by the in-module tests of their request/response types.

use actix_web::{App, test, web};
use utoipa::OpenApi;

use instrumentos_lib::api;

#[actix_rt::test]
async fn health_returns_200_with_status() {
    let app = test::init_service(
        App::new().service(web::scope("/api/v1").configure(api::configure_health_routes)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn unknown_route_returns_404() {
    let app = test::init_service(
        App::new().service(web::scope("/api/v1").configure(api::configure_health_routes)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[::core::prelude::v1::test]
fn openapi_document_lists_all_resources() {
    let doc = api::ApiDoc::openapi();
    let json = doc.to_json().unwrap();

    for path in [
        "/categorias",
        "/categorias/{id}/subcategorias",
        "/subcategorias",
        "/marcas",
        "/marcas/{id}/logotipo",
        "/marcas/{id}/modelos",
        "/modelos",
        "/instrumentos",
        "/instrumentos/{id}/fotos",
        "/fotos/{id}",
        "/dashboard",
        "/populate",
    ] {
        assert!(json.contains(&format!("\"{}\"", path)), "missing {}", path);
    }
}
