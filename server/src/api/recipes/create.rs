use super::get::RecipeResponse;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::models::{Difficulty, NewRecipe};
use crate::validation::{
    blank_to_none, Violations, COOKING_TIME_MINUTES, CUISINE_MAX_CHARS, DESCRIPTION_MAX_CHARS,
    SERVINGS, TITLE_MAX_CHARS,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    /// Required, at most 200 characters
    pub title: String,
    /// At most 1000 characters
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    /// 1 to 1440
    #[serde(default)]
    pub cooking_time_minutes: Option<i32>,
    /// 1 to 100
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<Difficulty>)]
    pub difficulty: Option<String>,
    /// At most 50 characters
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl CreateRecipeRequest {
    pub fn validate(self) -> Result<NewRecipe, ApiError> {
        let mut v = Violations::new();

        v.required("title", &self.title, Some(TITLE_MAX_CHARS));
        v.required("ingredients", &self.ingredients, None);
        v.required("instructions", &self.instructions, None);
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

        v.finish(NewRecipe {
            title: self.title,
            description: self.description.and_then(blank_to_none),
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time_minutes: self.cooking_time_minutes,
            servings: self.servings,
            difficulty,
            cuisine: self.cuisine.and_then(blank_to_none),
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(
        content = CreateRecipeRequest,
        example = json!({"title": "Tacos", "ingredients": "beef, lime", "instructions": "grill"})
    ),
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse,
            headers(("Location" = String, description = "URL of the new recipe"))),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(store): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let new_recipe = request.validate()?;

    let recipe = store.create(new_recipe).await?;
    tracing::info!(recipe_id = recipe.id, title = %recipe.title, "created recipe");

    let location = format!("{}/{}", super::PATH, recipe.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RecipeResponse::from(recipe)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: title.to_string(),
            description: None,
            ingredients: "beef, lime".to_string(),
            instructions: "grill".to_string(),
            cooking_time_minutes: None,
            servings: None,
            difficulty: None,
            cuisine: None,
        }
    }

    #[test]
    fn test_minimal_request_is_valid() {
        let recipe = request("Tacos").validate().unwrap();
        assert_eq!(recipe.title, "Tacos");
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.cooking_time_minutes, None);
    }

    #[test]
    fn test_title_boundary() {
        assert!(request(&"t".repeat(200)).validate().is_ok());

        let err = request(&"t".repeat(201)).validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(ref msg) if msg.contains("title")));
    }

    #[test]
    fn test_difficulty_values() {
        for ok in ["Easy", "Medium", "Hard"] {
            let recipe = CreateRecipeRequest {
                difficulty: Some(ok.to_string()),
                ..request("Tacos")
            }
            .validate()
            .unwrap();
            assert_eq!(recipe.difficulty.as_deref(), Some(ok));
        }

        let err = CreateRecipeRequest {
            difficulty: Some("Extreme".to_string()),
            ..request("Tacos")
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("difficulty"));
    }

    #[test]
    fn test_reports_every_violation() {
        let err = CreateRecipeRequest {
            ingredients: " ".to_string(),
            instructions: String::new(),
            cooking_time_minutes: Some(0),
            servings: Some(101),
            cuisine: Some("c".repeat(51)),
            description: Some("d".repeat(1001)),
            ..request("")
        }
        .validate()
        .unwrap_err();

        let msg = err.to_string();
        for field in [
            "title",
            "ingredients",
            "instructions",
            "description",
            "cookingTimeMinutes",
            "servings",
            "cuisine",
        ] {
            assert!(msg.contains(field), "{} missing from {:?}", field, msg);
        }
    }

    #[test]
    fn test_blank_optional_text_stored_as_null() {
        let recipe = CreateRecipeRequest {
            description: Some(String::new()),
            cuisine: Some("  ".to_string()),
            ..request("Tacos")
        }
        .validate()
        .unwrap();
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.cuisine, None);
    }
}
