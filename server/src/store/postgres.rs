use super::{RecipeStore, StoreError};
use crate::db::DbPool;
use crate::models::{NewRecipe, Recipe, RecipeChanges};
use crate::schema::recipes;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::fmt;

/// Recipe store backed by Postgres through a diesel r2d2 pool.
///
/// Diesel is synchronous, so each statement runs on tokio's blocking pool
/// inside a `db.query` span.
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl fmt::Debug for PgRecipeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgRecipeStore")
            .field("pool", &self.pool.state())
            .finish()
    }
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        // Created on the request task so the per-request query counter sees it
        let span = tracing::info_span!("db.query", db.operation = operation);

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("{} task failed: {}", operation, e)))?
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        self.run("list", |conn| {
            Ok(recipes::table
                .select(Recipe::as_select())
                .order(recipes::id.asc())
                .load(conn)?)
        })
        .await
    }

    async fn get(&self, id: i32) -> Result<Recipe, StoreError> {
        self.run("get", move |conn| {
            recipes::table
                .find(id)
                .select(Recipe::as_select())
                .first(conn)
                .optional()?
                .ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        self.run("create", move |conn| {
            Ok(diesel::insert_into(recipes::table)
                .values(&recipe)
                .returning(Recipe::as_returning())
                .get_result(conn)?)
        })
        .await
    }

    async fn update(&self, id: i32, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        self.run("update", move |conn| {
            diesel::update(recipes::table.find(id))
                .set((&changes, recipes::updated_at.eq(Some(Utc::now()))))
                .returning(Recipe::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.run("delete", move |conn| {
            match diesel::delete(recipes::table.find(id)).execute(conn)? {
                0 => Err(StoreError::NotFound(id)),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.run("ping", |conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
