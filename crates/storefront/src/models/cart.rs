//! Cart models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beaulytics_core::{CartId, CartItemId, ProductId, UserId};

/// A cart row. `user_id` is `None` for guest carts, whose ID lives in the
/// session instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// A cart item joined with its product, as used by the cart page,
/// checkout, and routine generation.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    pub ingredients: Vec<String>,
    pub qty: i32,
}

impl CartLine {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let line = CartLine {
            item_id: CartItemId::generate(),
            product_id: ProductId::generate(),
            name: "Toner".to_string(),
            price: Decimal::new(1250, 2), // 12.50
            image: None,
            category: Some("Toner".to_string()),
            ingredients: Vec::new(),
            qty: 3,
        };
        assert_eq!(line.line_total(), Decimal::new(3750, 2));
    }
}
