//! Dashboard route handlers: profile, skin profile panel, order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{Order, User};
use crate::state::AppState;

/// Order display data for the history list.
pub struct OrderView {
    pub id: String,
    pub total: rust_decimal::Decimal,
    pub status: String,
    pub date: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            total: order.total,
            status: order.status.to_string(),
            date: order.created_at.format("%b %e, %Y %H:%M").to_string(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/show.html")]
pub struct DashboardTemplate {
    pub user: User,
    pub skin_tags: Vec<String>,
    pub orders: Vec<OrderView>,
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Display the dashboard.
#[instrument(skip(state, current))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<DashboardTemplate> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(DashboardTemplate {
        skin_tags: user.skin_tags.clone(),
        orders: orders.iter().map(OrderView::from).collect(),
        user,
    })
}

/// Handle a profile update.
#[instrument(skip(state, current, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Form(form): Form<ProfileForm>,
) -> Response {
    let full_name = form
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let avatar_url = form
        .avatar_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match UserRepository::new(state.pool())
        .update_profile(current.id, full_name, avatar_url)
        .await
    {
        Ok(()) => Redirect::to("/dashboard").into_response(),
        Err(e) => {
            tracing::error!("Failed to update profile: {e}");
            Redirect::to("/dashboard?error=profile_update_failed").into_response()
        }
    }
}
