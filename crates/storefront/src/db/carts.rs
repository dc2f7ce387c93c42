//! Cart repository.
//!
//! Carts belong to a user (`user_id` set) or to a guest session
//! (`user_id` NULL, cart ID stored in the session cookie).

use sqlx::PgPool;

use beaulytics_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at FROM carts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get the cart owned by a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Create a cart, optionally owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, user_id: Option<UserId>) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (user_id) VALUES ($1) RETURNING id, user_id, created_at",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// All lines in a cart, joined with their products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT ci.id AS item_id, p.id AS product_id, p.name, p.price, p.image, \
                    p.category, p.ingredients, ci.qty \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to a cart, summing quantities when the line exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        qty: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, qty) VALUES ($1, $2, $3) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET qty = cart_items.qty + EXCLUDED.qty",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(qty)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_item_qty(
        &self,
        item_id: CartItemId,
        qty: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET qty = $1 WHERE id = $2")
            .bind(qty)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_item(&self, item_id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total item quantity in a cart (for the cart badge).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, cart_id: CartId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(qty), 0)::bigint FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Attach a guest cart to a user after login, unless the user already
    /// has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn claim_for_user(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE carts SET user_id = $1 \
             WHERE id = $2 AND user_id IS NULL \
               AND NOT EXISTS (SELECT 1 FROM carts WHERE user_id = $1)",
        )
        .bind(user_id)
        .bind(cart_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
