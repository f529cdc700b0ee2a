use crate::error::ApiError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// The `{id}` path segment of a recipe route.
///
/// Rejections come back as `ApiError` JSON. An integer too large for the id
/// column can't name a record, so it is a 404 rather than a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeId(pub i32);

impl<S> FromRequestParts<S> for RecipeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
        parse_recipe_id(&raw).map(RecipeId)
    }
}

fn parse_recipe_id(raw: &str) -> Result<i32, ApiError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Err(ApiError::NotFound(raw.to_string()))
    } else {
        Err(ApiError::InvalidInput(format!(
            "id must be an integer (got {:?})",
            raw
        )))
    }
}
