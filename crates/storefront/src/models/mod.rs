//! Domain models for the storefront.

pub mod cart;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{Cart, CartLine};
pub use ingredient::Ingredient;
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{ClickPlatform, Product};
pub use review::{Review, ReviewWithAuthor};
pub use user::{CurrentUser, StoredSkinProfile, User};

/// Session keys used across the storefront.
pub mod session_keys {
    /// The logged-in user (a [`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// Guest cart ID (a [`beaulytics_core::CartId`]).
    pub const CART_ID: &str = "cart_id";
    /// Google OAuth CSRF state token.
    pub const OAUTH_STATE: &str = "oauth_state";
}
