//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Logged-in users get a cart row keyed by user ID; guests get a cart whose
//! ID lives in the session cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use beaulytics_core::{CartId, CartItemId, ProductId};

use crate::analysis::{Routine, generate_routine};
use crate::db::{CartRepository, RepositoryError};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{CartLine, CurrentUser, session_keys};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub item_id: String,
    pub product_id: String,
    pub name: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub qty: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            category: line.category.clone(),
            image: line.image.clone(),
            qty: line.qty,
            price: line.price,
            line_total: line.line_total(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: i64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }

    fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: lines.iter().map(CartLine::line_total).sum(),
            item_count: lines.iter().map(|l| i64::from(l.qty)).sum(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Resolve the current cart ID: the user's cart when logged in, otherwise
/// the guest cart stored in the session.
pub async fn current_cart_id(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> std::result::Result<Option<CartId>, RepositoryError> {
    let repo = CartRepository::new(state.pool());

    if let Some(user) = user {
        return Ok(repo.get_for_user(user.id).await?.map(|cart| cart.id));
    }

    Ok(session
        .get::<CartId>(session_keys::CART_ID)
        .await
        .ok()
        .flatten())
}

/// Resolve the current cart ID, creating a cart when none exists yet.
async fn get_or_create_cart_id(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> std::result::Result<CartId, RepositoryError> {
    if let Some(cart_id) = current_cart_id(state, session, user).await? {
        return Ok(cart_id);
    }

    let repo = CartRepository::new(state.pool());
    let cart = repo.create(user.map(|u| u.id)).await?;

    if user.is_none()
        && let Err(e) = session.insert(session_keys::CART_ID, cart.id).await
    {
        tracing::error!("Failed to save guest cart ID to session: {e}");
    }

    Ok(cart.id)
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub qty: Option<i32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: CartItemId,
    pub qty: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: CartItemId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template, including the generated routine.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub routine: Routine,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page with the morning/night routine suggestion.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Result<CartShowTemplate> {
    let lines = match current_cart_id(&state, &session, user.as_ref()).await? {
        Some(cart_id) => CartRepository::new(state.pool()).lines(cart_id).await?,
        None => Vec::new(),
    };

    Ok(CartShowTemplate {
        routine: generate_routine(&lines),
        cart: CartView::from_lines(&lines),
    })
}

/// Add item to cart (HTMX).
///
/// Creates a cart if one doesn't exist yet. Returns the cart count badge
/// with an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let qty = form.qty.unwrap_or(1).max(1);

    let result = async {
        let cart_id = get_or_create_cart_id(&state, &session, user.as_ref()).await?;
        let repo = CartRepository::new(state.pool());
        repo.add_item(cart_id, form.product_id, qty).await?;
        repo.item_count(cart_id).await
    }
    .await;

    match result {
        Ok(count) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate { count },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update cart item quantity (HTMX). A quantity of zero removes the line.
#[instrument(skip(state, session, user))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let repo = CartRepository::new(state.pool());

    let result = if form.qty <= 0 {
        repo.remove_item(form.item_id).await.map(|_| ())
    } else {
        repo.update_item_qty(form.item_id, form.qty).await
    };

    if let Err(e) = result {
        tracing::error!("Failed to update cart: {e}");
    }

    render_cart_items(&state, &session, user.as_ref()).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if let Err(e) = CartRepository::new(state.pool()).remove_item(form.item_id).await {
        tracing::error!("Failed to remove from cart: {e}");
    }

    render_cart_items(&state, &session, user.as_ref()).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session, user))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Response {
    let count = match current_cart_id(&state, &session, user.as_ref()).await {
        Ok(Some(cart_id)) => CartRepository::new(state.pool())
            .item_count(cart_id)
            .await
            .unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!("Failed to resolve cart: {e}");
            0
        }
    };

    CartCountTemplate { count }.into_response()
}

/// Render the cart items fragment with an update trigger.
async fn render_cart_items(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> Response {
    let lines = match current_cart_id(state, session, user).await {
        Ok(Some(cart_id)) => CartRepository::new(state.pool())
            .lines(cart_id)
            .await
            .unwrap_or_default(),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to resolve cart: {e}");
            Vec::new()
        }
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_lines(&lines),
        },
    )
        .into_response()
}
