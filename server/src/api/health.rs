use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

pub const PATH: &str = "/api/health";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and storage are reachable", body = HealthResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn health(State(store): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    store.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        storage: store.backend_name().to_string(),
    }))
}
