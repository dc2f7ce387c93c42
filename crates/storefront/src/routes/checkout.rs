//! Checkout route handlers: Stripe redirect plus success/cancel callbacks.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{CartRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{CartLine, OrderStatus};
use crate::routes::cart::current_cart_id;
use crate::services::payments::CheckoutLineItem;
use crate::state::AppState;

/// Checkout success template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub order_id: Option<String>,
}

/// Checkout cancel template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/cancel.html")]
pub struct CheckoutCancelTemplate;

/// Start checkout: create a Stripe Checkout Session from the cart and
/// redirect to its hosted payment page.
#[instrument(skip(state, session, user))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Response> {
    let Some(stripe) = state.stripe() else {
        return Err(AppError::ServiceUnavailable(
            "checkout is not configured".to_string(),
        ));
    };

    let Some(cart_id) = current_cart_id(&state, &session, Some(&user)).await? else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let lines = CartRepository::new(state.pool()).lines(cart_id).await?;
    if lines.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let line_items: Vec<CheckoutLineItem> = lines
        .iter()
        .map(|line: &CartLine| CheckoutLineItem {
            name: line.name.clone(),
            image: line.image.clone(),
            unit_price: line.price,
            quantity: i64::from(line.qty),
        })
        .collect();

    let base_url = &state.config().base_url;
    let checkout_session = stripe
        .create_checkout_session(
            &line_items,
            &format!("{base_url}/checkout/success"),
            &format!("{base_url}/checkout/cancel"),
        )
        .await?;

    match checkout_session.url {
        Some(url) => Ok(Redirect::to(&url).into_response()),
        None => Err(AppError::Internal(
            "checkout session has no redirect URL".to_string(),
        )),
    }
}

/// Payment success callback: record the order and empty the cart, all in
/// one transaction, then confirm.
#[instrument(skip(state, session, user))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<CheckoutSuccessTemplate> {
    let Some(cart_id) = current_cart_id(&state, &session, Some(&user)).await? else {
        // Refreshing the success page after the cart was drained is fine
        return Ok(CheckoutSuccessTemplate { order_id: None });
    };

    let lines = CartRepository::new(state.pool()).lines(cart_id).await?;
    if lines.is_empty() {
        return Ok(CheckoutSuccessTemplate { order_id: None });
    }

    let order = OrderRepository::new(state.pool())
        .create_from_cart(user.id, cart_id, &lines, OrderStatus::Paid)
        .await?;

    Ok(CheckoutSuccessTemplate {
        order_id: Some(order.id.to_string()),
    })
}

/// Payment cancelled: show a notice, leave the cart untouched.
#[instrument]
pub async fn cancel() -> CheckoutCancelTemplate {
    CheckoutCancelTemplate
}
