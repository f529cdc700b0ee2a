use super::path::RecipeId;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::{Difficulty, Recipe};
use crate::AppState;
use axum::{
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A recipe as returned by the API. Absent optional fields serialize as `null`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    #[schema(value_type = Option<Difficulty>)]
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            cooking_time_minutes: recipe.cooking_time_minutes,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            cuisine: recipe.cuisine,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(store): State<AppState>,
    RecipeId(id): RecipeId,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = store.get(id).await?;
    Ok(Json(recipe.into()))
}
