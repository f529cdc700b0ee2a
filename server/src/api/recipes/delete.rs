use super::path::RecipeId;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
};

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(store): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<StatusCode, ApiError> {
    // Hard delete; there is no tombstone to restore from
    store.delete(id).await?;
    tracing::info!(recipe_id = id, "deleted recipe");
    Ok(StatusCode::NO_CONTENT)
}
