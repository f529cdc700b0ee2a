use super::get::RecipeResponse;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes, ordered by id", body = Vec<RecipeResponse>),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(store): State<AppState>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = store.list().await?;
    tracing::debug!(count = recipes.len(), "listed recipes");
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}
