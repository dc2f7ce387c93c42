//! External-collaborator services: auth, payments, and the AI relay.

pub mod auth;
pub mod payments;
pub mod skin_ai;

pub use auth::{AuthError, AuthService};
pub use payments::{CheckoutLineItem, CheckoutSession, PaymentError, StripeClient};
pub use skin_ai::{ChatMode, RecommendedProduct, RelayReply, SkinAiError, SkinAiService};
