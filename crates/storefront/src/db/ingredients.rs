//! Ingredient encyclopedia repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Ingredient;

/// Repository for ingredient encyclopedia entries.
pub struct IngredientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IngredientRepository<'a> {
    /// Create a new ingredient repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All entries, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Ingredient>, RepositoryError> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, slug, description, benefits, safety_level, created_at \
             FROM ingredients ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Look up one entry by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Ingredient>, RepositoryError> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, slug, description, benefits, safety_level, created_at \
             FROM ingredients WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(ingredient)
    }
}
