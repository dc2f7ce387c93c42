//! Review repository.

use sqlx::PgPool;

use beaulytics_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::{Review, ReviewWithAuthor};

/// Repository for review operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create or replace a user's review for a product.
    ///
    /// Callers validate the rating range first
    /// ([`crate::models::review::validate_submission`]); the table's CHECK
    /// constraint is the backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (user_id, product_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, \
                           updated_at = now() \
             RETURNING id, user_id, product_id, rating, comment, created_at, updated_at",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        Ok(review)
    }

    /// Reviews for a product with the reviewer's display name, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.rating, r.comment, u.full_name AS author, r.created_at \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.product_id = $1 \
             ORDER BY r.created_at DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// A user's existing review of a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT id, user_id, product_id, rating, comment, created_at, updated_at \
             FROM reviews WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(review)
    }
}
