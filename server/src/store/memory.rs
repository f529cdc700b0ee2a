use super::{RecipeStore, StoreError};
use crate::models::{NewRecipe, Recipe, RecipeChanges};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    recipes: BTreeMap<i32, Recipe>,
}

/// Recipe store that lives entirely in process memory.
///
/// Ids are handed out sequentially and never reused, matching a SERIAL column.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    inner: Mutex<Inner>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.lock()?.recipes.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Recipe, StoreError> {
        self.lock()?
            .recipes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut inner = self.lock()?;
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("recipe id space exhausted".to_string()))?;
        inner.last_id = id;

        let recipe = recipe.into_recipe(id, Utc::now());
        inner.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: i32, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        let mut inner = self.lock()?;
        let recipe = inner.recipes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        changes.apply(recipe, Utc::now());
        Ok(recipe.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.lock()?
            .recipes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
