//! Record access for recipes.
//!
//! The [`RecipeStore`] trait is the seam between HTTP handlers and storage.
//! [`PgRecipeStore`] is the durable implementation; [`MemoryRecipeStore`]
//! keeps everything in process and backs the test suite and `RECIPES_STORAGE=memory`.

mod memory;
mod postgres;

pub use memory::MemoryRecipeStore;
pub use postgres::PgRecipeStore;

use crate::config::{Config, StorageBackend};
use crate::db::{self, DbSetupError};
use crate::models::{NewRecipe, Recipe, RecipeChanges};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Recipe {0} not found")]
    NotFound(i32),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Storage for recipe records. Every method is a single atomic statement
/// against the backing store.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    /// All current recipes, ordered by id.
    async fn list(&self) -> Result<Vec<Recipe>, StoreError>;

    async fn get(&self, id: i32) -> Result<Recipe, StoreError>;

    /// Persist a new recipe. The store assigns `id` and `created_at`.
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    /// Apply `changes` and set `updated_at` to now, even when `changes` is empty.
    async fn update(&self, id: i32, changes: RecipeChanges) -> Result<Recipe, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Check that the backing store answers.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs (e.g. "postgres", "memory").
    fn backend_name(&self) -> &'static str;
}

/// Build the store selected by configuration.
pub fn create_store_from_config(config: &Config) -> Result<Arc<dyn RecipeStore>, DbSetupError> {
    match &config.storage {
        StorageBackend::Memory => Ok(Arc::new(MemoryRecipeStore::new())),
        StorageBackend::Postgres { database_url } => {
            let pool = db::create_pool(database_url, config.pool_size)?;
            Ok(Arc::new(PgRecipeStore::new(pool)))
        }
    }
}
