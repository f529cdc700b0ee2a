pub mod health;
pub mod recipes;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// All API routes with the store attached. Tracing and documentation layers
/// are added by `main`.
pub fn router(store: AppState) -> Router {
    Router::new()
        .route(health::PATH, get(health::health))
        .nest(recipes::PATH, recipes::router())
        .with_state(store)
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health),
    components(schemas(health::HealthResponse))
)]
struct HealthApi;

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Recipe Server", description = "CRUD API for recipe records"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![HealthApi::openapi(), recipes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.merge(module_spec);
    }

    spec
}
