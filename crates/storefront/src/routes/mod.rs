//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products                - Product listing (category/price/sort filters)
//! GET  /products/{id}           - Product detail (badges, reviews)
//! POST /products/{id}/reviews   - Submit a review (auth)
//! GET  /ingredients             - Ingredient encyclopedia
//! GET  /ingredients/{slug}      - Encyclopedia entry
//! GET  /compare                 - Comparison page (?ids=a,b,c)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page with routine suggestion
//! POST /cart/add                - Add to cart (returns count badge)
//! POST /cart/update             - Update quantity (returns items fragment)
//! POST /cart/remove             - Remove item (returns items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Create Stripe session and redirect (auth)
//! GET  /checkout/success        - Record the order, confirm (auth)
//! GET  /checkout/cancel         - Cancellation notice
//!
//! # Account
//! GET  /dashboard               - Profile, skin panel, order history (auth)
//! POST /dashboard/profile       - Update profile (auth)
//! GET  /questionnaire           - Skin questionnaire (auth)
//! POST /questionnaire           - Submit answers -> AI analysis -> tags (auth)
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//! GET  /auth/forgot             - Forgot password page
//! POST /auth/forgot             - Request reset token
//! GET  /auth/reset              - Reset page (?token=...)
//! POST /auth/reset              - Set new password
//! GET  /auth/oauth/google       - Redirect to Google consent
//! GET  /auth/callback           - OAuth callback
//!
//! # AI
//! GET  /ai                      - Chat page
//! POST /api/skin-ai             - AI relay (auth, tight rate limit)
//!
//! # Tracking APIs
//! POST /api/outbound-click      - Log a marketplace click
//! POST /api/compare-log         - Log a comparison set
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod compare;
pub mod dashboard;
pub mod home;
pub mod ingredients;
pub mod oauth;
pub mod products;
pub mod questionnaire;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{ai_rate_limiter, api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(products::submit_review))
}

/// Create the ingredient encyclopedia router.
pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ingredients::index))
        .route("/{slug}", get(ingredients::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the auth routes router (rate limited against brute force).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route(
            "/forgot",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        // Google OAuth
        .route("/oauth/google", get(oauth::login))
        .route("/callback", get(oauth::callback))
        .layer(auth_rate_limiter())
}

/// Create the JSON API router.
///
/// The relay route carries its own, much tighter limiter on top of the
/// general API limiter.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/skin-ai",
            post(api::skin_ai::relay).route_layer(ai_rate_limiter()),
        )
        .route("/outbound-click", post(api::tracking::outbound_click))
        .route("/compare-log", post(api::tracking::compare_log))
        .layer(api_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        .nest("/ingredients", ingredient_routes())
        .route("/compare", get(compare::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::start))
        .route("/checkout/success", get(checkout::success))
        .route("/checkout/cancel", get(checkout::cancel))
        // Account
        .route("/dashboard", get(dashboard::show))
        .route("/dashboard/profile", post(dashboard::update_profile))
        .route(
            "/questionnaire",
            get(questionnaire::show).post(questionnaire::submit),
        )
        // AI chat
        .route("/ai", get(chat::show))
        // Auth
        .nest("/auth", auth_routes())
        // JSON APIs
        .nest("/api", api_routes())
}
