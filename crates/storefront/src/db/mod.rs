//! Database operations for the storefront `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `products` - Catalog (denormalized rating/click counters)
//! - `carts` / `cart_items` - User and guest carts
//! - `orders` / `order_items` - Order history
//! - `reviews` - One review per user per product
//! - `users` / `user_passwords` / `password_reset_tokens` - Accounts
//! - `ingredients` - Ingredient encyclopedia
//! - `outbound_clicks` / `product_comparison_log` - Tracking
//! - tower-sessions' own session table
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p beaulytics-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod ingredients;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod tracking;
pub mod users;

pub use carts::CartRepository;
pub use ingredients::IngredientRepository;
pub use orders::OrderRepository;
pub use products::{CatalogFilter, CatalogSort, ProductRepository};
pub use reviews::ReviewRepository;
pub use tracking::TrackingRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
