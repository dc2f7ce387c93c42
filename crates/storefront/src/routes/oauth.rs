//! Google OAuth sign-in routes (authorization-code flow).
//!
//! `GET /auth/oauth/google` sends the browser to Google's consent screen
//! with a CSRF state token stashed in the session; `GET /auth/callback`
//! exchanges the returned code for tokens, reads the OpenID userinfo, and
//! finds or creates the matching local user.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use beaulytics_core::Email;

use crate::config::GoogleOAuthConfig;
use crate::db::{RepositoryError, UserRepository};
use crate::models::session_keys;
use crate::routes::auth::establish_session;
use crate::state::AppState;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const STATE_TOKEN_LENGTH: usize = 32;

/// Callback query parameters from Google.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OpenID userinfo response.
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

fn callback_url(state: &AppState) -> String {
    format!("{}/auth/callback", state.config().base_url)
}

fn login_error(reason: &str) -> Response {
    Redirect::to(&format!("/auth/login?error={reason}")).into_response()
}

/// Redirect to Google's consent screen.
#[instrument(skip(state, session))]
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let Some(oauth) = state.config().google_oauth.clone() else {
        return login_error("oauth_unavailable");
    };

    let csrf_state: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LENGTH)
        .map(char::from)
        .collect();

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &csrf_state).await {
        tracing::error!("Failed to store OAuth state: {e}");
        return login_error("session");
    }

    let redirect_url = format!(
        "{GOOGLE_AUTH_URL}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
        urlencoding::encode(&oauth.client_id),
        urlencoding::encode(&callback_url(&state)),
        urlencoding::encode("openid email profile"),
        urlencoding::encode(&csrf_state),
    );

    Redirect::to(&redirect_url).into_response()
}

/// Handle the OAuth callback: verify state, exchange the code, sign in.
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(oauth) = state.config().google_oauth.clone() else {
        return login_error("oauth_unavailable");
    };

    if let Some(error) = query.error {
        tracing::warn!("OAuth consent failed: {error}");
        return login_error("auth_failed");
    }

    // CSRF check: the state must round-trip through the session
    let expected: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();
    if expected.is_none() || expected != query.state {
        tracing::warn!("OAuth state mismatch");
        return login_error("auth_failed");
    }

    let Some(code) = query.code else {
        return login_error("auth_failed");
    };

    let userinfo = match fetch_userinfo(&oauth, &callback_url(&state), &code).await {
        Ok(info) => info,
        Err(e) => {
            tracing::error!("OAuth exchange failed: {e}");
            return login_error("auth_failed");
        }
    };

    let Some(email) = userinfo.email.as_deref().and_then(|e| Email::parse(e).ok()) else {
        return login_error("auth_failed");
    };

    // Find or create the local account
    let users = UserRepository::new(state.pool());
    let user = match users.get_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            match users
                .create_oauth(
                    &email,
                    userinfo.name.as_deref(),
                    userinfo.picture.as_deref(),
                )
                .await
            {
                Ok(user) => user,
                // Lost a race with a concurrent signup; read the winner
                Err(RepositoryError::Conflict(_)) => match users.get_by_email(&email).await {
                    Ok(Some(user)) => user,
                    _ => return login_error("auth_failed"),
                },
                Err(e) => {
                    tracing::error!("Failed to create OAuth user: {e}");
                    return login_error("auth_failed");
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to look up OAuth user: {e}");
            return login_error("auth_failed");
        }
    };

    establish_session(&state, &session, &user).await
}

/// Exchange an authorization code for tokens and fetch the userinfo.
async fn fetch_userinfo(
    oauth: &GoogleOAuthConfig,
    redirect_uri: &str,
    code: &str,
) -> Result<UserInfo, reqwest::Error> {
    let client = reqwest::Client::new();

    let token: TokenResponse = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.expose_secret()),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}
