//! Order repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use beaulytics_core::{CartId, OrderId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, Order, OrderItem, OrderStatus};

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a paid order from a cart's lines and empty the cart.
    ///
    /// The order insert, order-item inserts, and cart-item delete run in a
    /// single transaction so a failure never leaves a half-written order
    /// next to a drained cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is committed in that case.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
        lines: &[CartLine],
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let total: Decimal = lines.iter().map(CartLine::line_total).sum();

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, total, status) VALUES ($1, $2, $3) \
             RETURNING id, user_id, total, status, created_at",
        )
        .bind(user_id)
        .bind(total)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, qty, price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.qty)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, total, status, created_at \
             FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Lines of a single order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, qty, price \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
