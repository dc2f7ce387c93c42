//! Shared fixtures for the integration tests.
//!
//! Everything tested here is the storefront's pure logic: routine
//! generation, ingredient analysis, and the AI search-directive handling.
//! Nothing needs a database or network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::Utc;
use rust_decimal::Decimal;

use beaulytics_core::{CartItemId, ProductId};
use beaulytics_storefront::models::{CartLine, Product};

/// Build a cart line fixture.
#[must_use]
pub fn cart_line(name: &str, category: Option<&str>, ingredients: &[&str]) -> CartLine {
    CartLine {
        item_id: CartItemId::generate(),
        product_id: ProductId::generate(),
        name: name.to_string(),
        price: Decimal::new(1500, 2),
        image: None,
        category: category.map(String::from),
        ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
        qty: 1,
    }
}

/// Build a product fixture.
#[must_use]
pub fn product(
    name: &str,
    category: Option<&str>,
    ingredients: &[&str],
    concerns: &[&str],
) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        description: None,
        price: Decimal::new(1990, 2),
        image: None,
        category: category.map(String::from),
        size: None,
        ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
        concerns: concerns.iter().map(|s| (*s).to_string()).collect(),
        rating: None,
        review_count: 0,
        click_count: 0,
        shopee_url: None,
        tokopedia_url: None,
        created_at: Utc::now(),
    }
}
