use super::path::RecipeId;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::{Difficulty, RecipeChanges};
use crate::validation::{
    blank_to_none, Violations, COOKING_TIME_MINUTES, CUISINE_MAX_CHARS, DESCRIPTION_MAX_CHARS,
    SERVINGS, TITLE_MAX_CHARS,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

/// Partial update. Omitted and `null` fields keep their stored value.
#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    /// Set to empty string to clear the description
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    #[schema(value_type = Option<Difficulty>)]
    pub difficulty: Option<String>,
    /// Set to empty string to clear the cuisine
    pub cuisine: Option<String>,
}

impl UpdateRecipeRequest {
    pub fn validate(self) -> Result<RecipeChanges, ApiError> {
        let mut v = Violations::new();

        if let Some(title) = &self.title {
            v.required("title", title, Some(TITLE_MAX_CHARS));
        }
        if let Some(ingredients) = &self.ingredients {
            v.required("ingredients", ingredients, None);
        }
        if let Some(instructions) = &self.instructions {
            v.required("instructions", instructions, None);
        }
        if let Some(description) = &self.description {
            v.max_chars("description", description, DESCRIPTION_MAX_CHARS);
        }
        if let Some(minutes) = self.cooking_time_minutes {
            v.range("cookingTimeMinutes", minutes, COOKING_TIME_MINUTES);
        }
        if let Some(servings) = self.servings {
            v.range("servings", servings, SERVINGS);
        }
        let difficulty = self
            .difficulty
            .as_deref()
            .and_then(|d| v.difficulty("difficulty", d));
        if let Some(cuisine) = &self.cuisine {
            v.max_chars("cuisine", cuisine, CUISINE_MAX_CHARS);
        }

        v.finish(RecipeChanges {
            title: self.title,
            description: self.description.map(blank_to_none),
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time_minutes: self.cooking_time_minutes,
            servings: self.servings,
            difficulty,
            cuisine: self.cuisine.map(blank_to_none),
        })
    }
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 204, description = "Recipe updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(store): State<AppState>,
    RecipeId(id): RecipeId,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    // Validate before touching storage so a bad payload never partially applies
    let changes = request.validate()?;
    let touch_only = changes.is_empty();

    let recipe = store.update(id, changes).await?;
    tracing::info!(recipe_id = recipe.id, touch_only, "updated recipe");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_changes_nothing() {
        let changes = UpdateRecipeRequest::default().validate().unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let request: UpdateRecipeRequest =
            serde_json::from_str(r#"{"title": null, "servings": 6, "cuisine": null}"#).unwrap();
        let changes = request.validate().unwrap();
        assert_eq!(
            changes,
            RecipeChanges {
                servings: Some(6),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_optional_text_clears() {
        let changes = UpdateRecipeRequest {
            description: Some(String::new()),
            cuisine: Some("Thai".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.cuisine, Some(Some("Thai".to_string())));
    }

    #[test]
    fn test_supplied_fields_are_validated() {
        let err = UpdateRecipeRequest {
            title: Some(String::new()),
            servings: Some(0),
            difficulty: Some("Extreme".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("servings"));
        assert!(msg.contains("difficulty"));
    }
}
