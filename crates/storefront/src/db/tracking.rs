//! Tracking repository: outbound clicks and comparison logging.

use sqlx::PgPool;

use beaulytics_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::ClickPlatform;

/// Repository for click and comparison tracking.
pub struct TrackingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TrackingRepository<'a> {
    /// Create a new tracking repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an outbound marketplace click and bump the product's
    /// denormalized counter in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn record_click(
        &self,
        product_id: ProductId,
        platform: ClickPlatform,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO outbound_clicks (product_id, platform) VALUES ($1, $2)")
            .bind(product_id)
            .bind(platform)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE products SET click_count = click_count + 1 WHERE id = $1",
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Total recorded clicks for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn click_count(&self, product_id: ProductId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM outbound_clicks WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Log which products a signed-in user compared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn log_comparison(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<(), RepositoryError> {
        let uuids: Vec<uuid::Uuid> = product_ids.iter().map(|id| id.as_uuid()).collect();

        sqlx::query("INSERT INTO product_comparison_log (user_id, product_ids) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&uuids)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
