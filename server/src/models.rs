use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, ToSchema, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    /// Matching is case-sensitive: "easy" is not a difficulty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or(())
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A validated recipe ready to be inserted. `created_at` is left to the
/// column default.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub cuisine: Option<String>,
}

impl NewRecipe {
    pub fn into_recipe(self, id: i32, created_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cooking_time_minutes: self.cooking_time_minutes,
            servings: self.servings,
            difficulty: self.difficulty,
            cuisine: self.cuisine,
            created_at,
            updated_at: None,
        }
    }
}

/// A validated partial update. `None` leaves the stored value alone; for the
/// nullable text columns `Some(None)` clears the value.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub cuisine: Option<Option<String>>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        *self == RecipeChanges::default()
    }

    /// Apply the supplied fields to `recipe` and stamp `updated_at`.
    pub fn apply(self, recipe: &mut Recipe, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            recipe.title = title;
        }
        if let Some(description) = self.description {
            recipe.description = description;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            recipe.instructions = instructions;
        }
        if let Some(minutes) = self.cooking_time_minutes {
            recipe.cooking_time_minutes = Some(minutes);
        }
        if let Some(servings) = self.servings {
            recipe.servings = Some(servings);
        }
        if let Some(difficulty) = self.difficulty {
            recipe.difficulty = Some(difficulty);
        }
        if let Some(cuisine) = self.cuisine {
            recipe.cuisine = cuisine;
        }
        recipe.updated_at = Some(now);
    }
}
