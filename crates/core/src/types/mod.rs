//! Shared type definitions.

pub mod email;
pub mod id;
pub mod skin;

pub use email::{Email, EmailError};
pub use id::{
    CartId, CartItemId, IngredientId, OrderId, OrderItemId, ProductId, ReviewId, UserId,
};
pub use skin::{Concern, SkinProfile, SkinType};
