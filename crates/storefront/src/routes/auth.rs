//! Authentication route handlers.
//!
//! Handles login, registration, logout, and password reset. Failures
//! redirect back with an `?error=` query parameter rather than rendering
//! inline, so refreshes are safe.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CartRepository;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User, session_keys};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

use beaulytics_core::CartId;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub full_name: Option<String>,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters for the reset page (token from the emailed link).
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub google_oauth: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub google_oauth: bool,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub error: Option<String>,
    pub token: String,
}

// =============================================================================
// Login & Registration
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> LoginTemplate {
    LoginTemplate {
        error: query.error,
        success: query.success,
        google_oauth: state.config().google_oauth.is_some(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AuthService::new(state.pool());

    match service.login_with_password(&form.email, &form.password).await {
        Ok(user) => establish_session(&state, &session, &user).await,
        Err(AuthError::InvalidCredentials | AuthError::UserNotFound | AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            Redirect::to("/auth/login?error=failed").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        error: query.error,
        google_oauth: state.config().google_oauth.is_some(),
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let full_name = form
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let service = AuthService::new(state.pool());

    match service
        .register_with_password(&form.email, &form.password, full_name)
        .await
    {
        Ok(user) => establish_session(&state, &session, &user).await,
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/auth/register?error=email_taken").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/register?error=password_too_short").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/register?error=invalid_email").into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            Redirect::to("/auth/register?error=failed").into_response()
        }
    }
}

/// Put a user into the session and send them onward.
///
/// A guest cart from before login gets attached to the account. Users who
/// haven't filled in the questionnaire land there instead of the dashboard.
pub async fn establish_session(state: &AppState, session: &Session, user: &User) -> Response {
    let current = CurrentUser::from_user(user);

    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));

    // Claim the guest cart, if one was started before logging in
    if let Ok(Some(cart_id)) = session.get::<CartId>(session_keys::CART_ID).await {
        if let Err(e) = CartRepository::new(state.pool())
            .claim_for_user(cart_id, user.id)
            .await
        {
            tracing::warn!("Failed to claim guest cart: {e}");
        }
        let _ = session.remove::<CartId>(session_keys::CART_ID).await;
    }

    if user.skin_tags.is_empty() {
        Redirect::to("/questionnaire").into_response()
    } else {
        Redirect::to("/dashboard").into_response()
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(Query(query): Query<MessageQuery>) -> ForgotPasswordTemplate {
    ForgotPasswordTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle forgot password form submission.
///
/// Always answers with the same redirect to prevent email enumeration.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let service = AuthService::new(state.pool());

    match service.start_password_reset(&form.email).await {
        Ok(Some(token)) => {
            // No mail provider is wired up; surface the link operationally
            tracing::info!(
                email = %form.email,
                "password reset requested, link: /auth/reset?token={token}"
            );
        }
        Ok(None) => {
            tracing::info!(email = %form.email, "password reset requested for unknown email");
        }
        Err(e) => {
            tracing::warn!("Password reset request failed: {e}");
        }
    }

    Redirect::to("/auth/forgot?success=email_sent").into_response()
}

/// Display the reset password page.
///
/// Reached from the reset link, which carries the token.
pub async fn reset_password_page(Query(query): Query<ResetQuery>) -> Response {
    match query.token {
        Some(token) => ResetPasswordTemplate {
            error: query.error,
            token,
        }
        .into_response(),
        None => Redirect::to("/auth/forgot?error=invalid_reset_link").into_response(),
    }
}

/// Handle reset password form submission.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    if form.password != form.password_confirm {
        let redirect_url = format!(
            "/auth/reset?token={}&error=password_mismatch",
            urlencoding::encode(&form.token)
        );
        return Redirect::to(&redirect_url).into_response();
    }

    let service = AuthService::new(state.pool());

    match service
        .finish_password_reset(&form.token, &form.password)
        .await
    {
        Ok(()) => Redirect::to("/auth/login?success=password_reset").into_response(),
        Err(AuthError::WeakPassword(_)) => {
            let redirect_url = format!(
                "/auth/reset?token={}&error=password_too_short",
                urlencoding::encode(&form.token)
            );
            Redirect::to(&redirect_url).into_response()
        }
        Err(AuthError::InvalidResetToken) => {
            Redirect::to("/auth/forgot?error=invalid_reset_link").into_response()
        }
        Err(e) => {
            tracing::error!("Password reset failed: {e}");
            Redirect::to("/auth/forgot?error=reset_failed").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout: clear the user and destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}
